pub const PCAPNG_MAGIC: [u8; 4] = [0x0A, 0x0D, 0x0D, 0x0A];

pub const READER_BUFFER_SIZE: usize = 65536;
