//! Dynamic GPU buffer management with automatic resizing
//!
//! Provides buffers that grow automatically when data exceeds capacity,
//! using a 2x growth strategy to minimize reallocations. Growth never passes
//! the device's `max_buffer_size`. Point clouds are replaced wholesale on
//! every image load, so uploads always start at offset zero.

/// Capacity to allocate for `needed` bytes: double the request (at least
/// 1 KiB more than `capacity`), clamped to `max`.
#[must_use]
pub fn grow_capacity(needed: usize, capacity: usize, max: usize) -> usize {
    needed
        .saturating_mul(2)
        .max(capacity.saturating_add(1024))
        .min(max)
}

/// A GPU buffer that can grow dynamically
///
/// Uses a 2x growth strategy when capacity is exceeded.
/// Never shrinks (GPU buffers cannot be resized in place).
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize, // Capacity in bytes
    len: usize,      // Current data length in bytes
    max_size: usize, // Device limit in bytes
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Buffer with the given initial byte capacity.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let max_size =
            usize::try_from(device.limits().max_buffer_size).unwrap_or(usize::MAX);
        let capacity = initial_capacity.max(64).min(max_size); // Minimum 64 bytes

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            capacity,
            len: 0,
            max_size,
            usage,
            label: label.to_owned(),
        }
    }

    /// Whether `bytes` of data can ever be held on this device.
    pub fn fits(&self, bytes: usize) -> bool {
        bytes <= self.max_size
    }

    /// Write data to buffer, growing if necessary
    ///
    /// Returns `true` if buffer was reallocated. Data larger than the
    /// device limit is refused with a warning and the buffer is unchanged.
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let data_bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = data_bytes.len();
        if !self.fits(needed) {
            log::warn!(
                "{}: {} bytes exceed the device limit of {}",
                self.label,
                needed,
                self.max_size
            );
            return false;
        }

        let reallocated = if needed > self.capacity {
            let new_capacity =
                grow_capacity(needed, self.capacity, self.max_size);

            self.buffer.destroy();
            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: new_capacity as u64,
                usage: self.usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            log::debug!(
                "{}: grew {} -> {} bytes",
                self.label,
                self.capacity,
                new_capacity
            );
            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, data_bytes);
        }
        self.len = needed;

        reallocated
    }

    /// Underlying wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes of live data.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free the GPU allocation now instead of waiting for drop.
    pub fn destroy(&mut self) {
        self.buffer.destroy();
        self.len = 0;
    }
}

/// Typed wrapper for DynamicBuffer with cleaner API
///
/// Tracks item count rather than byte length.
pub struct TypedBuffer<T> {
    inner: DynamicBuffer,
    count: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Specified initial capacity (in items).
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let initial_capacity = size_of::<T>() * capacity;
        Self {
            inner: DynamicBuffer::new(device, label, initial_capacity, usage),
            count: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Write data to buffer, growing if necessary
    ///
    /// Returns `true` if buffer was reallocated. Oversized data leaves the
    /// previous contents live.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        if !self.fits(data.len()) {
            return false;
        }
        self.count = data.len();
        self.inner.write(device, queue, data)
    }

    /// Whether `count` items can ever be held on this device.
    pub fn fits(&self, count: usize) -> bool {
        count
            .checked_mul(size_of::<T>())
            .is_some_and(|bytes| self.inner.fits(bytes))
    }

    /// Underlying wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        self.inner.buffer()
    }

    /// Slice covering the live items only.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.inner
            .buffer()
            .slice(..(self.count * size_of::<T>()) as u64)
    }

    /// Number of live items.
    pub fn count(&self) -> usize {
        self.count
    }

    /// `true` if no items are live.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Allocated capacity in items.
    pub fn capacity(&self) -> usize {
        self.inner.capacity() / size_of::<T>()
    }

    /// Free the GPU allocation now.
    pub fn destroy(&mut self) {
        self.inner.destroy();
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_doubles_below_the_limit() {
        assert_eq!(grow_capacity(4096, 64, usize::MAX), 8192);
        assert_eq!(grow_capacity(100, 64, usize::MAX), 1088);
    }

    #[test]
    fn growth_is_clamped_to_the_device_limit() {
        // 4000x3000 positions on a 256 MiB device.
        let limit = 268_435_456;
        let needed = 12_000_000 * size_of::<[f32; 3]>();
        let grown = grow_capacity(needed, 64, limit);
        assert_eq!(grown, limit);
        assert!(grown >= needed);
    }

    #[test]
    fn growth_saturates_instead_of_overflowing() {
        assert_eq!(grow_capacity(usize::MAX - 1, 64, usize::MAX), usize::MAX);
    }
}
