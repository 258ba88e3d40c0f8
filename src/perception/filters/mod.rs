//! Debouncing of noisy color classifications

use super::color::ColorLabel;

/// Per-label tally of repeated classifications
///
/// `Unknown` samples are not counted; they only dilute the vote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorVote {
    counts: [u32; 4],
}

impl ColorVote {
    pub fn new() -> Self {
        ColorVote::default()
    }

    pub fn record(&mut self, label: ColorLabel) {
        if let Some(slot) = Self::slot(label) {
            self.counts[slot] += 1;
        }
    }

    pub fn count(&self, label: ColorLabel) -> u32 {
        Self::slot(label).map_or(0, |slot| self.counts[slot])
    }

    /// Label with the highest count, or `Unknown` if it falls short of
    /// `quorum`. Ties go to the first label in [`ColorLabel::VOTING`] order.
    pub fn resolve(&self, quorum: u32) -> ColorLabel {
        let mut winner = ColorLabel::VOTING[0];
        let mut best = self.counts[0];
        for (label, &count) in ColorLabel::VOTING.iter().zip(&self.counts).skip(1) {
            if count > best {
                winner = *label;
                best = count;
            }
        }
        if best >= quorum {
            winner
        } else {
            ColorLabel::Unknown
        }
    }

    fn slot(label: ColorLabel) -> Option<usize> {
        ColorLabel::VOTING.iter().position(|&l| l == label)
    }
}

impl FromIterator<ColorLabel> for ColorVote {
    fn from_iter<I: IntoIterator<Item = ColorLabel>>(iter: I) -> Self {
        let mut vote = ColorVote::new();
        for label in iter {
            vote.record(label);
        }
        vote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::color::ColorLabel::*;

    #[test]
    fn majority_wins() {
        let vote: ColorVote = [Green, Green, Green, Red, Unknown].into_iter().collect();
        assert_eq!(vote.count(Green), 3);
        assert_eq!(vote.count(Unknown), 0);
        assert_eq!(vote.resolve(2), Green);
    }

    #[test]
    fn quorum_is_inclusive() {
        let vote: ColorVote = [Magenta, Magenta, Unknown, Unknown].into_iter().collect();
        assert_eq!(vote.resolve(2), Magenta);
        assert_eq!(vote.resolve(3), Unknown);
    }

    #[test]
    fn ties_follow_enumeration_order() {
        let vote: ColorVote = [White, Magenta, White, Magenta].into_iter().collect();
        assert_eq!(vote.resolve(2), Magenta);

        let vote: ColorVote = [Green, White, Green, White, Red, Red].into_iter().collect();
        assert_eq!(vote.resolve(2), Red);
    }

    #[test]
    fn empty_vote_is_unknown() {
        assert_eq!(ColorVote::new().resolve(2), Unknown);
        let vote: ColorVote = std::iter::repeat(Unknown).take(8).collect();
        assert_eq!(vote.resolve(2), Unknown);
    }

    #[test]
    fn same_sequence_same_verdict() {
        let labels = [Red, Green, Unknown, Green, Red, White, Green, Red];
        let first: ColorVote = labels.into_iter().collect();
        let second: ColorVote = labels.into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.resolve(2), Red);
    }
}
