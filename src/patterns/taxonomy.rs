//! Fixed topic taxonomy and the Indonesian term overlay.

use std::collections::HashMap;

/// Topic labels in export order. Labels and order are part of the CSV contract.
pub const TOPICS: [&str; 12] = [
    "Fintech",
    "AI",
    "Artificial Intelligence",
    "Blockchain",
    "Big Data",
    "Machine Learning",
    "Cloud Computing",
    "Digital Banking",
    "Mobile Banking",
    "E-Payment",
    "Cybersecurity",
    "Digital Service",
];

/// A topic label with its literal alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicTerms {
    pub topic: &'static str,
    pub terms: Vec<String>,
}

/// Localized alternatives keyed by topic label.
pub type Overlay = HashMap<String, Vec<String>>;

const BASE_TERMS: [(&str, &[&str]); 12] = [
    ("Fintech", &["fintech", "financial technology"]),
    ("AI", &["AI"]),
    ("Artificial Intelligence", &["artificial intelligence"]),
    ("Blockchain", &["blockchain", "distributed ledger"]),
    ("Big Data", &["big data"]),
    ("Machine Learning", &["machine learning"]),
    ("Cloud Computing", &["cloud computing", "cloud-based"]),
    ("Digital Banking", &["digital banking", "digital bank"]),
    ("Mobile Banking", &["mobile banking", "m-banking"]),
    ("E-Payment", &["e-payment", "electronic payment", "digital payment"]),
    ("Cybersecurity", &["cybersecurity", "cyber security"]),
    ("Digital Service", &["digital service", "digital services"]),
];

const INDONESIAN_TERMS: [(&str, &[&str]); 11] = [
    ("Fintech", &["teknologi finansial", "tekfin"]),
    ("Artificial Intelligence", &["kecerdasan buatan"]),
    ("Blockchain", &["rantai blok"]),
    ("Big Data", &["mahadata", "data besar"]),
    ("Machine Learning", &["pembelajaran mesin"]),
    ("Cloud Computing", &["komputasi awan"]),
    ("Digital Banking", &["perbankan digital", "bank digital"]),
    ("Mobile Banking", &["perbankan seluler", "perbankan bergerak"]),
    ("E-Payment", &["pembayaran elektronik", "pembayaran digital"]),
    ("Cybersecurity", &["keamanan siber"]),
    ("Digital Service", &["layanan digital"]),
];

/// The base taxonomy in export order.
pub fn base_taxonomy() -> Vec<TopicTerms> {
    BASE_TERMS
        .iter()
        .map(|&(topic, terms)| TopicTerms {
            topic,
            terms: terms.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

/// Built-in Indonesian overlay.
pub fn indonesian_overlay() -> Overlay {
    INDONESIAN_TERMS
        .iter()
        .map(|&(topic, terms)| {
            (
                topic.to_string(),
                terms.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

pub fn topic_labels() -> impl Iterator<Item = &'static str> {
    TOPICS.iter().copied()
}
