pub mod embedding_extractor;
pub mod identity_record;
pub mod match_verdict;
pub mod matcher;
pub mod signature_store;
pub mod similarity;
