//! The workforce qualification matrix.
//!
//! A static binary worker × skill matrix, validated and indexed once at
//! construction.  All queries are O(1); the grouping views (`workers_with`,
//! `skills_of`) are precomputed in O(W·Q).  `level` returns 0/1 today but is
//! the seam through which a graded qualification model would extend.

use drc_core::{SkillId, WorkerId};

use crate::error::{SimError, SimResult};

/// Immutable worker × skill qualification matrix.
#[derive(Clone, Debug)]
pub struct QualificationMatrix {
    skills:    usize,
    workers:   usize,
    /// Worker-major: `entries[w * skills + q]`.
    entries:   Vec<bool>,
    by_skill:  Vec<Vec<WorkerId>>,
    by_worker: Vec<Vec<SkillId>>,
}

impl QualificationMatrix {
    /// Build from a worker-major vector.
    ///
    /// Fails unless `entries.len()` is a positive exact multiple of
    /// `skills` — anything else means the workforce vector was assembled
    /// against the wrong plant.
    pub fn new(entries: Vec<bool>, skills: usize) -> SimResult<Self> {
        if skills == 0 || entries.is_empty() || entries.len() % skills != 0 {
            return Err(SimError::QualificationShape { len: entries.len(), skills });
        }
        let workers = entries.len() / skills;

        let mut by_skill = vec![Vec::new(); skills];
        let mut by_worker = vec![Vec::new(); workers];
        for w in 0..workers {
            for q in 0..skills {
                if entries[w * skills + q] {
                    by_skill[q].push(WorkerId::new(w));
                    by_worker[w].push(SkillId::new(q));
                }
            }
        }

        Ok(QualificationMatrix { skills, workers, entries, by_skill, by_worker })
    }

    /// Does `worker` hold `skill`?
    #[inline]
    pub fn is_qualified(&self, worker: WorkerId, skill: SkillId) -> bool {
        self.entries[worker.index() * self.skills + skill.index()]
    }

    /// Qualification level — 0 or 1 in the binary model.
    #[inline]
    pub fn level(&self, worker: WorkerId, skill: SkillId) -> u8 {
        self.is_qualified(worker, skill) as u8
    }

    /// Workers holding `skill`, ascending.
    pub fn workers_with(&self, skill: SkillId) -> &[WorkerId] {
        &self.by_skill[skill.index()]
    }

    /// Skills held by `worker`, ascending.
    pub fn skills_of(&self, worker: WorkerId) -> &[SkillId] {
        &self.by_worker[worker.index()]
    }

    /// How many skills `worker` holds — the dispatch heuristics' ranking key.
    #[inline]
    pub fn flexibility(&self, worker: WorkerId) -> usize {
        self.by_worker[worker.index()].len()
    }

    /// Count of all true entries.
    pub fn total_qualifications(&self) -> usize {
        self.by_worker.iter().map(Vec::len).sum()
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    pub fn skill_count(&self) -> usize {
        self.skills
    }
}
