//! Read command implementation

use super::progress::IndicatifProgress;
use super::Bank;
use ccflash_core::FlashDriver;
use std::path::Path;

/// Chunk size for reading
const READ_CHUNK_SIZE: usize = 4096;

/// Read `length` bytes at `offset` (default: to the end of the bank) into a file
pub fn cmd_read(
    bank: &mut Bank,
    output: &Path,
    offset: u32,
    length: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    bank.auto_probe()?;

    let length = match length {
        Some(length) => length,
        None => bank
            .size()
            .checked_sub(offset)
            .ok_or_else(|| format!("Offset 0x{:X} is past the end of the bank", offset))?,
    };

    let mut data = vec![0u8; length as usize];
    let mut progress = IndicatifProgress::new();
    progress.create_bar(data.len() as u64, "Reading");

    let mut pos = offset;
    for (i, chunk) in data.chunks_mut(READ_CHUNK_SIZE).enumerate() {
        bank.read(pos, chunk)?;
        pos += chunk.len() as u32;
        progress.set_position((i * READ_CHUNK_SIZE + chunk.len()) as u64);
    }
    progress.finish("Read complete");

    std::fs::write(output, &data)?;
    println!("Read {} bytes to {}", data.len(), output.display());
    Ok(())
}
