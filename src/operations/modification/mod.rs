mod split;

pub use split::{MissedFace, SplitAtIso, SplitAtLevels, SplitOutcome, SplitReport};
