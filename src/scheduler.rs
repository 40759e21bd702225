use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::error::{BlockFailure, Result};
use crate::record::FlatRecord;
use crate::segment::Block;

/// A decoder that can turn any single block into a record on its own.
///
/// Implementors are shared read-only between workers; each worker owns one
/// `Scratch` that it reuses across the blocks it decodes.
pub trait BlockDecoder: Sync {
    type Scratch: Default;

    fn decode_block(&self, data: &[u8], block: Block, scratch: &mut Self::Scratch) -> Result<FlatRecord>;
}

pub type BlockOutcome = std::result::Result<FlatRecord, BlockFailure>;

/// Fixed worker pool that decodes blocks and returns outcomes in block order.
pub struct Scheduler {
    workers: usize,
    pool: Option<ThreadPool>,
}

impl Scheduler {
    pub fn new(workers: usize) -> std::result::Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let pool = if workers > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("cdr-decode-{}", i))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self { workers, pool })
    }

    pub fn sequential() -> Self {
        Self {
            workers: 1,
            pool: None,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Decode every block. Outcome `i` always belongs to `blocks[i]`.
    ///
    /// Small inputs (fewer than two blocks per worker) are decoded on the
    /// calling thread. Otherwise the blocks are cut into one contiguous run
    /// per worker and each run writes into its own slice of result slots.
    pub fn run<D: BlockDecoder>(&self, decoder: &D, data: &[u8], blocks: &[Block]) -> Vec<BlockOutcome> {
        let pool = match &self.pool {
            Some(pool) if blocks.len() >= 2 * self.workers => pool,
            _ => {
                let mut scratch = D::Scratch::default();
                return blocks
                    .iter()
                    .map(|&block| decode_one(decoder, data, block, &mut scratch))
                    .collect();
            }
        };

        let run_len = blocks.len().div_ceil(self.workers);
        let mut slots: Vec<Option<BlockOutcome>> = Vec::with_capacity(blocks.len());
        slots.resize_with(blocks.len(), || None);

        pool.install(|| {
            slots
                .par_chunks_mut(run_len)
                .zip(blocks.par_chunks(run_len))
                .for_each(|(out, run)| {
                    let mut scratch = D::Scratch::default();
                    for (slot, &block) in out.iter_mut().zip(run) {
                        *slot = Some(decode_one(decoder, data, block, &mut scratch));
                    }
                });
        });

        slots.into_iter().flatten().collect()
    }
}

#[inline]
fn decode_one<D: BlockDecoder>(decoder: &D, data: &[u8], block: Block, scratch: &mut D::Scratch) -> BlockOutcome {
    decoder
        .decode_block(data, block, scratch)
        .map_err(|error| BlockFailure {
            offset: block.start,
            error,
        })
}
