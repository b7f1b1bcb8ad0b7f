use crate::{
    buffer::{Block, Retention, RetentionBuffer},
    config::Config,
};
use async_trait::async_trait;
use rand::Rng;
use std::{ops::Range, time::Duration};
use tracing::{debug, info};

/// The pause between two iterations.
#[async_trait]
pub trait Pacer {
    async fn pause(&mut self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub iteration: u64,
    pub size: usize,
    pub retention: Retention,
}

/// The allocate / retain / release loop.
#[derive(Debug)]
pub struct Workload<R, P> {
    rng: R,
    pacer: P,
    sizes: Range<usize>,
    interval: Duration,
    touch_pages: bool,
    buffer: RetentionBuffer,
    iterations: u64,
}

impl<R: Rng, P: Pacer> Workload<R, P> {
    pub fn new(config: &Config, rng: R, pacer: P) -> anyhow::Result<Self> {
        config.validate()?;

        Ok(Self {
            rng,
            pacer,
            sizes: config.min_block_size..config.max_block_size,
            interval: config.interval(),
            touch_pages: config.touch_pages,
            buffer: RetentionBuffer::new(config.threshold),
            iterations: 0,
        })
    }

    pub fn draw_size(&mut self) -> usize {
        self.rng.gen_range(self.sizes.clone())
    }

    /// Allocates one block and hands it to the buffer. Does not pause.
    pub fn step(&mut self) -> Tick {
        let size = self.draw_size();
        let block = if self.touch_pages {
            Block::touched(size)
        } else {
            Block::new(size)
        };
        let retention = self.buffer.push(block);
        self.iterations += 1;

        Tick {
            iteration: self.iterations,
            size,
            retention,
        }
    }

    /// Never returns; the caller decides when to stop polling it.
    pub async fn run(&mut self) {
        loop {
            let tick = self.step();
            match tick.retention {
                Retention::Retained(retained) => {
                    debug!(iteration = tick.iteration, size = tick.size, retained, "allocated");
                }
                Retention::Cleared { released, bytes } => {
                    info!(iteration = tick.iteration, released, bytes, "retention buffer cleared");
                }
            }
            self.pacer.pause(self.interval).await;
        }
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn buffer(&self) -> &RetentionBuffer {
        &self.buffer
    }
}
