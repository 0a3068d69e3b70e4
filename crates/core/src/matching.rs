//! Greedy first-fit matching of student selections to lecturer selections.
//!
//! This is a pure function of the candidate rows passed in: no persistence,
//! no clock, no randomness. Calling it twice over the same inputs returns
//! identical results, which is what makes the preview endpoint safe to call
//! speculatively.

use std::collections::HashSet;

use crate::types::{DbId, Timestamp};

/// Title used when neither side declared a topic.
pub const FALLBACK_TOPIC_TITLE: &str = "Undetermined topic";

/// An approved student selection, flattened for matching.
#[derive(Debug, Clone)]
pub struct StudentCandidate {
    pub student_id: DbId,
    pub department_id: DbId,
    /// Explicitly preferred lecturer, tried before any fallback.
    pub preferred_lecturer_id: Option<DbId>,
    /// Topic title declared by the student, if any.
    pub topic_title: Option<String>,
    /// Lower value = higher priority.
    pub priority: i32,
    pub created_at: Timestamp,
}

/// An approved lecturer selection, flattened for matching.
#[derive(Debug, Clone)]
pub struct LecturerCandidate {
    /// The lecturer's faculty id.
    pub lecturer_id: DbId,
    /// The selection row id, needed for the capacity bump at confirm time.
    pub selection_id: DbId,
    pub department_id: DbId,
    /// Topic title offered by the lecturer, if any.
    pub topic_title: Option<String>,
    /// Lower value = higher priority.
    pub priority: i32,
    pub capacity: i32,
    pub current_capacity: i32,
}

impl LecturerCandidate {
    fn has_room(&self) -> bool {
        self.current_capacity < self.capacity
    }
}

/// One student/lecturer pairing produced by a matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub student_id: DbId,
    pub lecturer_id: DbId,
    pub lecturer_selection_id: DbId,
    pub topic_title: String,
}

/// Match students to lecturers, deterministic greedy first-fit.
///
/// Students are taken in (priority, created_at, student_id) order. Each
/// student tries, in strict order: the explicitly preferred lecturer, then
/// any same-department lecturer, then any lecturer at all — each only if it
/// has room and was not already matched this run. A lecturer receives at
/// most one match per invocation regardless of remaining capacity.
/// Students with no feasible lecturer are omitted from the result.
pub fn match_candidates(
    students: &[StudentCandidate],
    lecturers: &[LecturerCandidate],
) -> Vec<MatchedPair> {
    let mut students: Vec<&StudentCandidate> = students.iter().collect();
    students.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.student_id.cmp(&b.student_id))
    });

    let mut lecturers: Vec<&LecturerCandidate> = lecturers.iter().collect();
    lecturers.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.lecturer_id.cmp(&b.lecturer_id))
    });

    let mut matched_students: HashSet<DbId> = HashSet::new();
    let mut used_lecturers: HashSet<DbId> = HashSet::new();
    let mut pairs = Vec::new();

    for student in students {
        if matched_students.contains(&student.student_id) {
            continue;
        }

        let available = |l: &LecturerCandidate| {
            l.has_room() && !used_lecturers.contains(&l.lecturer_id)
        };

        // (a) the explicitly preferred lecturer, (b) any lecturer in the
        // student's department, (c) any lecturer anywhere
        let chosen = student
            .preferred_lecturer_id
            .and_then(|id| {
                lecturers
                    .iter()
                    .copied()
                    .find(|&l| l.lecturer_id == id && available(l))
            })
            .or_else(|| {
                lecturers
                    .iter()
                    .copied()
                    .find(|&l| l.department_id == student.department_id && available(l))
            })
            .or_else(|| lecturers.iter().copied().find(|&l| available(l)));

        let Some(lecturer) = chosen else {
            continue;
        };

        matched_students.insert(student.student_id);
        used_lecturers.insert(lecturer.lecturer_id);
        pairs.push(MatchedPair {
            student_id: student.student_id,
            lecturer_id: lecturer.lecturer_id,
            lecturer_selection_id: lecturer.selection_id,
            topic_title: student
                .topic_title
                .clone()
                .or_else(|| lecturer.topic_title.clone())
                .unwrap_or_else(|| FALLBACK_TOPIC_TITLE.to_string()),
        });
    }

    pairs
}
