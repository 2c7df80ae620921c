pub mod mmr;
pub mod retriever;
pub mod vector;
