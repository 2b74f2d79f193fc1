pub mod agent;
pub mod random;
pub mod aggressive;

pub use agent::Agent;
pub use random::RandomAgent;
pub use aggressive::AggressiveAgent;

/// Build an agent by CLI name. Unknown names fall back to random.
pub fn make_agent(kind: &str, seed: u64) -> Box<dyn Agent> {
    match kind {
        "aggressive" => Box::new(AggressiveAgent::new()),
        _ => Box::new(RandomAgent::new(seed)),
    }
}
