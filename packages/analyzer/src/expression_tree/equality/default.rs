use super::NodeEqualityComparer;

/// Plain structural equality with case-insensitive names and literals
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNodeEqualityComparer;

impl NodeEqualityComparer for DefaultNodeEqualityComparer {
    fn name(&self) -> &'static str {
        "default"
    }
}
