//! An example demonstrating how to replay a short talk-page revision
//! history through a Reconstructor and print the conversation actions it
//! emits. In a real scenario, revisions would come from a dump parser
//! feeding ascending-timestamp text snapshots for one page.

use chrono::Utc;
use convo_reconstruct::{Reconstructor, ReconstructConfig, Revision};

fn revision(rev_id: i64, user: &str, text: &str) -> Revision {
    Revision {
        rev_id,
        timestamp: Utc::now(),
        page_id: "12345".to_string(),
        page_title: "Talk:Example".to_string(),
        user_id: user.to_string(),
        user_text: user.to_string(),
        text: text.to_string(),
    }
}

fn main() {
    let mut reconstructor = Reconstructor::new("12345", "Talk:Example", ReconstructConfig::default());

    println!("Replaying revision history...");

    let revisions = vec![
        revision(1, "Alice", "== Opening topic ==\n:First remark here.\n"),
        revision(
            2,
            "Bob",
            "== Opening topic ==\n:First remark here.\n::A reply to that.\n",
        ),
        revision(
            3,
            "Alice",
            "== Opening topic ==\n:First remark, expanded a bit.\n::A reply to that.\n",
        ),
    ];

    for rev in revisions {
        let (checkpoint, actions) = reconstructor
            .process(&rev)
            .expect("revision should classify cleanly");

        println!("Revision {} produced {} action(s):", rev.rev_id, actions.len());
        for action in &actions {
            println!(
                " - {:?} id={} indentation={} content={:?}",
                action.action_type,
                action.id,
                action.indentation,
                action.content_text()
            );
        }
        println!("  checkpoint bytes: {}", checkpoint.encode().unwrap().len());
    }
}
