mod common;

mod test_action_prevention;
mod test_serde_replay;
