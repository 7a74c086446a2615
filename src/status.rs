/// Incoming particle
pub const INCOMING: i32 = -1;
/// Outgoing final state particle
pub const OUTGOING: i32 = 1;
/// Intermediate space-like propagator defining an x and Q^2 which should be preserved
pub const INTERMEDIATE_SPACELIKE: i32 = -2;
/// Intermediate resonance, mass should be preserved
pub const INTERMEDIATE_RESONANCE: i32 = 2;
/// Intermediate resonance, for documentation only
pub const INTERMEDIATE_DOC: i32 = 3;
/// Incoming beam particles at time t = −∞
pub const INCOMING_BEAM: i32 = -9;

/// The role a status code plays when partitioning an event
///
/// Only [INCOMING] and [OUTGOING] are distinguished, every other
/// status code is carried along without interpretation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Initial,
    Final,
    Other,
}

impl From<i32> for State {
    fn from(status: i32) -> Self {
        match status {
            INCOMING => State::Initial,
            OUTGOING => State::Final,
            _ => State::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(State::from(INCOMING), State::Initial);
        assert_eq!(State::from(OUTGOING), State::Final);
        for status in [INTERMEDIATE_SPACELIKE, INTERMEDIATE_RESONANCE, INTERMEDIATE_DOC, INCOMING_BEAM] {
            assert_eq!(State::from(status), State::Other);
        }
    }
}
