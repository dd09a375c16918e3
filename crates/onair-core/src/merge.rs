//! Team and digest merging
//!
//! Two independent passes over the same segment sequence. Team runs break
//! on a team change and on any commercial or digest segment; digest groups
//! ignore team identity entirely.

use crate::Segment;

/// Consecutive segments sharing one team label
#[derive(Clone, Debug, PartialEq)]
pub struct TeamSpan {
    pub team: String,
    pub start: f64,
    pub end: f64,
}

impl TeamSpan {
    /// Blank teams are kept in the merge output but never labeled
    pub fn is_blank(&self) -> bool {
        self.team.trim().is_empty()
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Consecutive digest segments
#[derive(Clone, Debug, PartialEq)]
pub struct DigestSpan {
    pub start: f64,
    pub end: f64,
    /// Number of segments in the group
    pub count: usize,
}

impl DigestSpan {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Collapse consecutive same-team segments into spans
pub fn merge_teams(segments: &[Segment]) -> Vec<TeamSpan> {
    let mut merged = Vec::new();
    let mut open: Option<TeamSpan> = None;

    for segment in segments {
        if segment.is_digest || segment.is_commercial {
            merged.extend(open.take());
            continue;
        }
        match open.as_mut() {
            Some(run) if run.team == segment.team => run.end = segment.end,
            _ => {
                merged.extend(open.take());
                open = Some(TeamSpan {
                    team: segment.team.clone(),
                    start: segment.start,
                    end: segment.end,
                });
            }
        }
    }
    merged.extend(open);

    merged
}

/// Group consecutive digest segments
pub fn merge_digests(segments: &[Segment]) -> Vec<DigestSpan> {
    let mut groups: Vec<DigestSpan> = Vec::new();
    let mut extending = false;

    for segment in segments {
        if !segment.is_digest {
            extending = false;
            continue;
        }
        match groups.last_mut() {
            Some(group) if extending => {
                group.end = segment.end;
                group.count += 1;
            }
            _ => groups.push(DigestSpan {
                start: segment.start,
                end: segment.end,
                count: 1,
            }),
        }
        extending = true;
    }

    groups
}
