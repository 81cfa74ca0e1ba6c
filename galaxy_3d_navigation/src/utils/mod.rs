//! Small shared helpers

mod node_id_sequence;

pub(crate) use node_id_sequence::NodeIdSequence;
