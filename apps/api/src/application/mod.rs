pub mod accounts;
pub mod agent_insight;
pub mod alerts;
pub mod forecast;
pub mod ingest_score;
pub mod metric_tree;
pub mod reports;
pub mod seed_demo;
pub mod snapshots;
pub mod warehouses;
