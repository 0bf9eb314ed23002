//! LOADM (Disk Extended BASIC) binary image loader.
//!
//! An image is a sequence of data blocks
//! `00 len_hi len_lo addr_hi addr_lo <len bytes>` closed by a postamble
//! `FF 00 00 exec_hi exec_lo`. Blocks are stored through the machine's
//! current memory map, so an image loads where the running program would
//! see it.

use coco3_core::core::machine::Machine;
use thiserror::Error;

const BLOCK_DATA: u8 = 0x00;
const BLOCK_POSTAMBLE: u8 = 0xFF;
const HEADER_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinaryError {
    #[error("empty binary image")]
    Empty,
    #[error("truncated block header at offset {offset:#06X}")]
    TruncatedHeader { offset: usize },
    #[error("block at offset {offset:#06X} declares {expected} bytes, {actual} present")]
    TruncatedBlock {
        offset: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown block marker {marker:#04X} at offset {offset:#06X}")]
    UnknownMarker { offset: usize, marker: u8 },
}

/// One data block of a parsed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    pub address: u16,
    pub data: &'a [u8],
}

/// Summary of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryImage {
    pub blocks: usize,
    pub bytes: usize,
    /// Execution address from the postamble, if present.
    pub exec: Option<u16>,
}

/// Split an image into its blocks and execution address without touching
/// any machine. A missing postamble is accepted.
pub fn parse(data: &[u8]) -> Result<(Vec<Block<'_>>, Option<u16>), BinaryError> {
    if data.is_empty() {
        return Err(BinaryError::Empty);
    }

    let mut blocks = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let Some(header) = data.get(offset..offset + HEADER_LEN) else {
            return Err(BinaryError::TruncatedHeader { offset });
        };
        let len = u16::from_be_bytes([header[1], header[2]]) as usize;
        let address = u16::from_be_bytes([header[3], header[4]]);
        match header[0] {
            BLOCK_DATA => {
                let start = offset + HEADER_LEN;
                let available = data.len() - start;
                if available < len {
                    return Err(BinaryError::TruncatedBlock {
                        offset,
                        expected: len,
                        actual: available,
                    });
                }
                blocks.push(Block {
                    address,
                    data: &data[start..start + len],
                });
                offset = start + len;
            }
            BLOCK_POSTAMBLE => return Ok((blocks, Some(address))),
            marker => return Err(BinaryError::UnknownMarker { offset, marker }),
        }
    }
    Ok((blocks, None))
}

/// Parse `data` and store every block through `machine`'s memory map.
/// Nothing is written unless the whole image parses.
pub fn load(machine: &mut dyn Machine, data: &[u8]) -> Result<BinaryImage, BinaryError> {
    let (blocks, exec) = parse(data)?;
    let mut bytes = 0;
    for block in &blocks {
        let mut addr = block.address;
        for &byte in block.data {
            let phys = machine.translate(addr);
            machine.write_physical(phys, byte);
            addr = addr.wrapping_add(1);
        }
        bytes += block.data.len();
        log::debug!(
            "loaded {} bytes at {:04X}",
            block.data.len(),
            block.address
        );
    }
    Ok(BinaryImage {
        blocks: blocks.len(),
        bytes,
        exec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_blocks_and_exec_address() {
        let image = [
            0x00, 0x00, 0x02, 0x30, 0x00, 0xAA, 0xBB, // block 1
            0x00, 0x00, 0x01, 0x40, 0x00, 0xCC, // block 2
            0xFF, 0x00, 0x00, 0x30, 0x00, // postamble
        ];
        let (blocks, exec) = parse(&image).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].address, 0x3000);
        assert_eq!(blocks[0].data, &[0xAA, 0xBB]);
        assert_eq!(blocks[1].data, &[0xCC]);
        assert_eq!(exec, Some(0x3000));
    }

    #[test]
    fn missing_postamble_has_no_exec() {
        let (blocks, exec) = parse(&[0x00, 0x00, 0x01, 0x10, 0x00, 0x12]).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(exec, None);
    }

    #[test]
    fn rejects_malformed_images() {
        assert_eq!(parse(&[]), Err(BinaryError::Empty));
        assert_eq!(
            parse(&[0x00, 0x00]),
            Err(BinaryError::TruncatedHeader { offset: 0 })
        );
        assert_eq!(
            parse(&[0x00, 0x00, 0x04, 0x10, 0x00, 0x01]),
            Err(BinaryError::TruncatedBlock {
                offset: 0,
                expected: 4,
                actual: 1
            })
        );
        assert_eq!(
            parse(&[0x55, 0x00, 0x00, 0x00, 0x00]),
            Err(BinaryError::UnknownMarker {
                offset: 0,
                marker: 0x55
            })
        );
    }
}
