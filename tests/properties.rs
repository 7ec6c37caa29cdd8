//! Property tests for the invariants that must hold no matter what revision
//! history is fed in: tokenizer stability/totality, page-state well-
//! formedness after every revision, action id uniqueness, and checkpoint
//! round-tripping.

use std::collections::HashSet;

use chrono::Utc;
use convo_reconstruct::token::{join, tokenize};
use convo_reconstruct::{CheckpointBlob, ReconstructConfig, Reconstructor, Revision};
use quickcheck::{quickcheck, TestResult};

fn rev(rev_id: i64, text: &str) -> Revision {
    Revision {
        rev_id,
        timestamp: Utc::now(),
        page_id: "p1".to_string(),
        page_title: "Talk:Example".to_string(),
        user_id: "1".to_string(),
        user_text: "Alice".to_string(),
        text: text.to_string(),
    }
}

fn sanitize(text: &str) -> String {
    // Strip NUL bytes and cap length; arbitrary `String`s from quickcheck can
    // otherwise blow up token counts in the boundary-tuning pass.
    text.chars().filter(|c| *c != '\0').take(2_000).collect()
}

quickcheck! {
    fn tokenize_reconstructs_input_exactly(text: String) -> bool {
        let text = sanitize(&text);
        join(&tokenize(&text)) == text
    }

    fn tokenize_is_deterministic(text: String) -> bool {
        let text = sanitize(&text);
        tokenize(&text) == tokenize(&text)
    }
}

quickcheck! {
    fn single_revision_leaves_a_well_formed_page_state(text: String) -> TestResult {
        let text = sanitize(&text);
        if text.trim().is_empty() {
            return TestResult::discard();
        }
        let mut r = Reconstructor::new("p1", "Talk:Example", ReconstructConfig::default());
        let result = r.process(&rev(1, &text));
        TestResult::from_bool(result.is_ok())
    }

    fn action_ids_within_a_revision_are_unique(texts: Vec<String>) -> TestResult {
        if texts.is_empty() || texts.len() > 6 {
            return TestResult::discard();
        }
        let mut r = Reconstructor::new("p1", "Talk:Example", ReconstructConfig::default());
        let mut ok = true;
        for (i, text) in texts.iter().enumerate() {
            let text = sanitize(text);
            let Ok((_, actions)) = r.process(&rev(i as i64 + 1, &text)) else {
                return TestResult::discard();
            };
            let mut seen = HashSet::new();
            for action in &actions {
                if !seen.insert(action.id.clone()) {
                    ok = false;
                }
            }
        }
        TestResult::from_bool(ok)
    }

    fn checkpoint_round_trips_and_resumes(text: String) -> TestResult {
        let text = sanitize(&text);
        if text.trim().is_empty() {
            return TestResult::discard();
        }
        let mut r = Reconstructor::new("p1", "Talk:Example", ReconstructConfig::default());
        let Ok((blob, _)) = r.process(&rev(1, &text)) else {
            return TestResult::discard();
        };
        let Ok(bytes) = blob.encode() else {
            return TestResult::failed();
        };
        let Ok(decoded) = CheckpointBlob::decode(&bytes) else {
            return TestResult::failed();
        };
        let mut resumed = Reconstructor::load(decoded, ReconstructConfig::default());
        TestResult::from_bool(resumed.process(&rev(2, &text)).is_ok())
    }

    fn repeating_a_revision_is_idempotent(text: String) -> TestResult {
        let text = sanitize(&text);
        if text.trim().is_empty() {
            return TestResult::discard();
        }
        let mut r = Reconstructor::new("p1", "Talk:Example", ReconstructConfig::default());
        let Ok((first_blob, _)) = r.process(&rev(1, &text)) else {
            return TestResult::discard();
        };
        let Ok((second_blob, actions)) = r.process(&rev(2, &text)) else {
            return TestResult::failed();
        };
        TestResult::from_bool(actions.is_empty() && second_blob.page_state.actions == first_blob.page_state.actions)
    }
}
