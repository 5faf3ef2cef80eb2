//! Scenario-based tests for the extraction pipeline

mod concurrent_jobs;
mod extraction_fallback;
mod failure_paths;
mod orphan_repair;
mod renderer_fallback;
