pub const PAGE_SIZE: usize = 4096;

/// A heap byte block of a fixed length. Its contents carry no meaning.
#[derive(Debug)]
pub struct Block(Box<[u8]>);

impl Block {
    pub fn new(size: usize) -> Self {
        Self(vec![0; size].into_boxed_slice())
    }

    /// Writes one byte per page so the block is actually resident.
    /// A zeroed allocation can be served by untouched pages otherwise.
    pub fn touched(size: usize) -> Self {
        let mut block = Self::new(size);
        block
            .0
            .iter_mut()
            .step_by(PAGE_SIZE)
            .for_each(|x| *x = x.wrapping_add(1));
        block
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// The block was kept; holds the buffer length after the append.
    Retained(usize),
    /// The append overflowed the threshold and everything was released.
    Cleared { released: usize, bytes: usize },
}

/// Blocks held on purpose to keep memory pressure up, dropped all at once
/// when their count passes `threshold`.
#[derive(Debug)]
pub struct RetentionBuffer {
    blocks: Vec<Block>,
    threshold: usize,
    bytes: usize,
}

impl RetentionBuffer {
    pub fn new(threshold: usize) -> Self {
        Self {
            blocks: Vec::new(),
            threshold,
            bytes: 0,
        }
    }

    pub fn push(&mut self, block: Block) -> Retention {
        self.bytes += block.len();
        self.blocks.push(block);

        if self.blocks.len() > self.threshold {
            let released = self.blocks.len();
            let bytes = self.bytes;
            self.blocks.clear();
            self.bytes = 0;
            Retention::Cleared { released, bytes }
        } else {
            Retention::Retained(self.blocks.len())
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Total length of the retained blocks.
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_len() {
        assert_eq!(Block::new(1000).len(), 1000);
        assert_eq!(Block::new(0).len(), 0);
    }

    #[test]
    fn test_touched_block() {
        let block = Block::touched(3 * PAGE_SIZE + 1);
        assert_eq!(block.len(), 3 * PAGE_SIZE + 1);
        let touched = block.0.iter().filter(|&&x| x != 0).count();
        assert_eq!(touched, 4);
        assert_eq!(block.0[PAGE_SIZE], 1);
        assert_eq!(block.0[PAGE_SIZE + 1], 0);
    }

    #[test]
    fn test_retains_up_to_threshold() {
        let mut buf = RetentionBuffer::new(200);
        for i in 1..=200 {
            assert_eq!(buf.push(Block::new(16)), Retention::Retained(i));
        }
        assert_eq!(buf.len(), 200);
        assert_eq!(buf.bytes(), 200 * 16);
    }

    #[test]
    fn test_clears_past_threshold() {
        let mut buf = RetentionBuffer::new(200);
        for _ in 0..200 {
            buf.push(Block::new(16));
        }
        assert_eq!(
            buf.push(Block::new(32)),
            Retention::Cleared {
                released: 201,
                bytes: 200 * 16 + 32
            }
        );
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.bytes(), 0);

        // starts over
        assert_eq!(buf.push(Block::new(16)), Retention::Retained(1));
    }

    #[test]
    fn test_zero_threshold_clears_every_push() {
        let mut buf = RetentionBuffer::new(0);
        for _ in 0..3 {
            assert_eq!(
                buf.push(Block::new(8)),
                Retention::Cleared {
                    released: 1,
                    bytes: 8
                }
            );
            assert_eq!(buf.len(), 0);
        }
    }
}
