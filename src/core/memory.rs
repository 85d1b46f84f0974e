//! Memory - Snapshot of target process memory
//!
//! Values are materialized from a region-based byte image of the debuggee's
//! address space. Reads that fall outside every mapped region (or into a
//! region without read permission) fail with a `MemoryError`.

use thiserror::Error;

/// Memory operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("could not read memory at {address:#x}")]
    Unmapped { address: u64 },

    #[error("partial read at {address:#x}: wanted {wanted} bytes, got {got}")]
    PartialRead { address: u64, wanted: usize, got: usize },

    #[error("access denied at {address:#x}")]
    AccessDenied { address: u64 },

    #[error("invalid memory region: {address:#x} ({size} bytes) overlaps an existing region")]
    Overlap { address: u64, size: usize },

    #[error("invalid memory region: {address:#x} ({size} bytes) runs past the end of the address space")]
    OutOfRange { address: u64, size: usize },

    #[error("invalid string at {address:#x}: {reason}")]
    InvalidString { address: u64, reason: String },
}

/// Memory protection flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryProtection {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl MemoryProtection {
    pub const RX: Self = Self {
        read: true,
        write: false,
        execute: true,
    };
    pub const RW: Self = Self {
        read: true,
        write: true,
        execute: false,
    };
    pub const NONE: Self = Self {
        read: false,
        write: false,
        execute: false,
    };
}

/// A mapped region of the target address space
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    /// Start address of the region
    pub base_address: u64,

    /// Region contents
    pub bytes: Vec<u8>,

    /// Memory protection flags
    pub protection: MemoryProtection,

    /// Optional name (e.g., "[stack]", "[heap]")
    pub name: Option<String>,
}

impl MemoryRegion {
    fn end_address(&self) -> u64 {
        self.base_address.saturating_add(self.bytes.len() as u64)
    }

    fn contains(&self, address: u64) -> bool {
        address >= self.base_address && address < self.end_address()
    }
}

/// Byte image of the target's mapped memory
#[derive(Debug, Clone, Default)]
pub struct MemoryImage {
    /// Regions sorted by base address
    regions: Vec<MemoryRegion>,
}

impl MemoryImage {
    /// Create an empty image (every read fails)
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a new region; regions must not overlap
    pub fn map(
        &mut self,
        base_address: u64,
        bytes: Vec<u8>,
        protection: MemoryProtection,
        name: Option<&str>,
    ) -> Result<(), MemoryError> {
        if base_address.checked_add(bytes.len() as u64).is_none() {
            return Err(MemoryError::OutOfRange {
                address: base_address,
                size: bytes.len(),
            });
        }
        let region = MemoryRegion {
            base_address,
            bytes,
            protection,
            name: name.map(str::to_string),
        };
        let overlaps = self.regions.iter().any(|r| {
            region.base_address < r.end_address() && r.base_address < region.end_address()
        });
        if overlaps {
            return Err(MemoryError::Overlap {
                address: base_address,
                size: region.bytes.len(),
            });
        }

        log::trace!(
            "Mapping region {:#x}..{:#x} ({:?})",
            region.base_address,
            region.end_address(),
            region.name
        );
        let pos = self
            .regions
            .partition_point(|r| r.base_address < region.base_address);
        self.regions.insert(pos, region);
        Ok(())
    }

    /// Mapped regions in address order
    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    fn region_for(&self, address: u64) -> Option<&MemoryRegion> {
        self.regions.iter().find(|r| r.contains(address))
    }

    /// Read `size` bytes starting at `address`
    pub fn read(&self, address: u64, size: usize) -> Result<Vec<u8>, MemoryError> {
        let mut buffer = vec![0u8; size];
        let got = self.read_into(address, &mut buffer)?;
        if got < size {
            return Err(MemoryError::PartialRead {
                address,
                wanted: size,
                got,
            });
        }
        Ok(buffer)
    }

    /// Read memory into an existing buffer, returning the bytes copied.
    /// Reads do not span regions.
    pub fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<usize, MemoryError> {
        let region = self
            .region_for(address)
            .ok_or(MemoryError::Unmapped { address })?;
        if !region.protection.read {
            return Err(MemoryError::AccessDenied { address });
        }

        let offset = (address - region.base_address) as usize;
        let available = &region.bytes[offset..];
        let count = available.len().min(buffer.len());
        buffer[..count].copy_from_slice(&available[..count]);
        Ok(count)
    }

    /// Write bytes into an already mapped, writable region
    pub fn write(&mut self, address: u64, data: &[u8]) -> Result<usize, MemoryError> {
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.contains(address))
            .ok_or(MemoryError::Unmapped { address })?;
        if !region.protection.write {
            return Err(MemoryError::AccessDenied { address });
        }

        let offset = (address - region.base_address) as usize;
        let count = (region.bytes.len() - offset).min(data.len());
        region.bytes[offset..offset + count].copy_from_slice(&data[..count]);
        Ok(count)
    }

    /// Read a null-terminated string of at most `max_len` bytes
    pub fn read_c_string(&self, address: u64, max_len: usize) -> Result<String, MemoryError> {
        let mut buffer = vec![0u8; max_len];
        let bytes_read = self.read_into(address, &mut buffer)?;

        // Find null terminator
        let null_pos = buffer[..bytes_read]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(bytes_read);

        String::from_utf8(buffer[..null_pos].to_vec()).map_err(|e| MemoryError::InvalidString {
            address,
            reason: format!("invalid UTF-8: {}", e),
        })
    }

    fn read_array<const N: usize>(&self, address: u64) -> Result<[u8; N], MemoryError> {
        let mut buffer = [0u8; N];
        let got = self.read_into(address, &mut buffer)?;
        if got < N {
            return Err(MemoryError::PartialRead {
                address,
                wanted: N,
                got,
            });
        }
        Ok(buffer)
    }

    /// Read a primitive value from memory (little endian)
    pub fn read_u64(&self, address: u64) -> Result<u64, MemoryError> {
        self.read_array(address).map(u64::from_le_bytes)
    }

    pub fn read_u32(&self, address: u64) -> Result<u32, MemoryError> {
        self.read_array(address).map(u32::from_le_bytes)
    }

    pub fn read_u16(&self, address: u64) -> Result<u16, MemoryError> {
        self.read_array(address).map(u16::from_le_bytes)
    }

    pub fn read_u8(&self, address: u64) -> Result<u8, MemoryError> {
        self.read_array::<1>(address).map(|b| b[0])
    }

    /// Read an unsigned little-endian integer of 1, 2, 4 or 8 bytes
    pub fn read_unsigned(&self, address: u64, size: usize) -> Result<u64, MemoryError> {
        match size {
            1 => self.read_u8(address).map(u64::from),
            2 => self.read_u16(address).map(u64::from),
            4 => self.read_u32(address).map(u64::from),
            _ => self.read_u64(address),
        }
    }
}
