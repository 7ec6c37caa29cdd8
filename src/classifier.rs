//! The action classifier: the per-revision heart of the reconstructor.
//! Consumes the diff between the last-known and current page text, the
//! previous page state, and the deleted-comment index; produces the
//! revision's action records and the next page state. Directly grounded on
//! the `insert()` function of the original implementation, phase by phase.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::action::{make_action_id, Action, ActionType};
use crate::config::ReconstructConfig;
use crate::deleted_index::DeletedIndex;
use crate::diff::{DiffName, DiffOp};
use crate::errors::ReconstructError;
use crate::page_state::{PageEntry, PageState};
use crate::revision::Revision;
use crate::token::{join, tokenize, Token};

/// A removed comment recorded for checkpointing, mirroring the
/// `deleted_comments` list of the original implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedComment {
    pub text: String,
    pub action_id: String,
    pub indentation: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdditionKind {
    Comment,
    Section,
}

#[derive(Debug, Clone)]
struct AdditionCandidate {
    a1: i64,
    a2: i64,
    b1: i64,
    b2: i64,
    tokens: Vec<Token>,
    kind: AdditionKind,
}

#[derive(Debug, Clone)]
struct RemovalCandidate {
    old_key: i64,
    tokens: Vec<Token>,
}

#[derive(Clone, Copy)]
enum Bound {
    Left,
    Right,
}

/// Classify one revision's diff against `old_page`, returning the emitted
/// actions (sorted, Phase H) and the next page state.
pub fn classify(
    rev: &Revision,
    old_page: &PageState,
    diff_ops: &[DiffOp],
    new_tokens: &[Token],
    deleted_index: &mut DeletedIndex,
    deleted_comments: &mut Vec<DeletedComment>,
    config: &ReconstructConfig,
) -> Result<(Vec<Action>, PageState), ReconstructError> {
    let old_actions = old_page.sorted_keys();
    let old_keys_set: HashSet<i64> = old_actions.iter().copied().collect();

    // --- Phase A: categorize diff ops ---
    let mut raw_additions: Vec<AdditionCandidate> = Vec::new();
    let mut tmp_removals: Vec<(i64, RemovalCandidate)> = Vec::new();
    let mut modified_starts: HashSet<i64> = HashSet::new();

    for op in diff_ops {
        match op.name {
            DiffName::Equal => {}
            DiffName::Insert => {
                let a1 = op.a1 as i64;
                let starts_at_break = op.tokens.first().map(Token::is_break).unwrap_or(false)
                    || op.b1 == 0
                    || (op.b1 > 0 && new_tokens[op.b1 - 1].is_break());
                let ends_at_break = op.b2 == new_tokens.len()
                    || op.tokens.last().map(Token::is_break).unwrap_or(false);

                if old_keys_set.contains(&a1) && starts_at_break && ends_at_break {
                    let seed = AdditionCandidate {
                        a1,
                        a2: a1,
                        b1: op.b1 as i64,
                        b2: op.b2 as i64,
                        tokens: op.tokens.clone(),
                        kind: AdditionKind::Comment,
                    };
                    raw_additions.extend(divide_into_sections(seed));
                } else {
                    let start = old_page.get_action_start(a1).unwrap_or(a1);
                    modified_starts.insert(start);
                }
            }
            DiffName::Delete => {
                let delete_start = op.a1 as i64;
                let delete_end = op.a2 as i64;
                let Some(deleted_action_start) = old_page.find_pos(delete_start) else { continue };
                let deleted_action_end = match old_page.find_pos(delete_end) {
                    Some(i) => (i + 1).min(old_actions.len()),
                    None => old_actions.len(),
                };
                if deleted_action_start >= deleted_action_end {
                    continue;
                }
                let covered = &old_actions[deleted_action_start..deleted_action_end];
                let mut start_token = 0usize;
                for (ind, &act) in covered.iter().enumerate() {
                    if act == delete_end {
                        break;
                    }
                    let next_idx = deleted_action_start + ind + 1;
                    if next_idx >= old_actions.len() {
                        break;
                    }
                    let next_key = old_actions[next_idx];
                    let a1 = delete_start.max(act);
                    let a2 = delete_end.min(next_key);
                    let len = (a2 - a1).max(0) as usize;
                    let tokens = op.tokens[start_token..(start_token + len).min(op.tokens.len())].to_vec();
                    start_token += len;

                    let is_tail = act == *covered.last().unwrap();
                    if delete_start > act || is_tail || modified_starts.contains(&act) {
                        modified_starts.insert(act);
                    } else {
                        tmp_removals.push((act, RemovalCandidate { old_key: act, tokens }));
                    }
                }
            }
        }
    }

    // Post-filter: additions colliding with a (now fully known) modified start
    // are absorbed by the modification instead of emitted standalone.
    raw_additions.retain(|c| !modified_starts.contains(&c.a1));

    // Deferred removal filter: a partial only survives as a removal if its
    // action was never, by any later op, folded into modified_starts.
    let mut removed_starts: HashSet<i64> = HashSet::new();
    let mut tentative_removals: Vec<RemovalCandidate> = Vec::new();
    for (act, cand) in tmp_removals {
        if !modified_starts.contains(&act) {
            removed_starts.insert(act);
            tentative_removals.push(cand);
        }
    }

    // --- Phase B: detect rearrangements ---
    let (final_removals, additions, rearrangements) = detect_rearrangements(
        tentative_removals,
        raw_additions,
        config.rearrangement_min_tokens,
    );

    let mut new_page: BTreeMap<i64, PageEntry> = BTreeMap::new();
    let mut end_tokens: Vec<(i64, i64)> = Vec::new();
    let mut actions: Vec<Action> = Vec::new();
    let mut seq = 0usize;

    // --- Phase C (+ rearrangement registration): carry forward & rearrange ---
    for &act in &old_actions {
        let Some(entry) = old_page.actions.get(&act) else { continue };
        if entry.is_end_of_page() {
            continue;
        }
        if !(modified_starts.contains(&act) || removed_starts.contains(&act)) {
            let new_offset = locate_new_token_pos(act, diff_ops, Bound::Left);
            new_page.insert(new_offset, entry.clone());
        }
        if let Some(new_offset) = rearrangements.iter().find(|(k, _, _)| *k == act).map(|(_, o, _)| *o) {
            let reply_to = preceding_live_action(&new_page, new_offset);
            new_page.insert(new_offset, entry.clone());
            let id = make_action_id(rev.rev_id, seq);
            seq += 1;
            let content = rearranged_content(&rearrangements, act);
            let (action_id, indentation) = match entry {
                PageEntry::Live { action_id, indentation } => (action_id.clone(), *indentation),
                PageEntry::EndOfPage => unreachable!(),
            };
            actions.push(Action {
                id,
                action_type: ActionType::CommentRearrangement,
                parent_id: Some(action_id),
                reply_to_id: reply_to,
                indentation,
                content,
                user_id: rev.user_id.clone(),
                user_text: rev.user_text.clone(),
                timestamp: rev.timestamp,
                rev_id: rev.rev_id,
                page_id: rev.page_id.clone(),
                page_title: rev.page_title.clone(),
                conversation_id: None,
                authors: Vec::new(),
            });
            end_tokens.push((new_offset, new_offset + content_len(&rearrangements, act)));
        }
    }

    // --- Removals: registered right after rearrangements, before modifications ---
    for removal in final_removals {
        let Some(PageEntry::Live { action_id, indentation }) = old_page.actions.get(&removal.old_key) else {
            continue;
        };
        let id = make_action_id(rev.rev_id, seq);
        seq += 1;
        actions.push(Action {
            id,
            action_type: ActionType::CommentRemoval,
            parent_id: Some(action_id.clone()),
            reply_to_id: None,
            indentation: *indentation,
            content: removal.tokens.clone(),
            user_id: rev.user_id.clone(),
            user_text: rev.user_text.clone(),
            timestamp: rev.timestamp,
            rev_id: rev.rev_id,
            page_id: rev.page_id.clone(),
            page_title: rev.page_title.clone(),
            conversation_id: None,
            authors: Vec::new(),
        });
        if removal.tokens.len() > config.restoration_min_tokens {
            let text = join(&removal.tokens);
            deleted_index.add(text.clone(), (action_id.clone(), *indentation));
            deleted_comments.push(DeletedComment {
                text,
                action_id: action_id.clone(),
                indentation: *indentation,
            });
        }
    }

    // --- Phase D: emit modifications ---
    let mut modified_sorted: Vec<i64> = modified_starts.into_iter().collect();
    modified_sorted.sort_unstable();
    for k in modified_sorted {
        let Some(PageEntry::Live { action_id, .. }) = old_page.actions.get(&k) else { continue };
        let Some(old_end) = old_page.get_action_end(k) else { continue };
        let new_start = locate_new_token_pos(k, diff_ops, Bound::Left);
        let new_end = locate_new_token_pos(old_end, diff_ops, Bound::Right);
        let lo = new_start.max(0) as usize;
        let hi = new_end.max(new_start).min(new_tokens.len() as i64) as usize;
        let tokens = new_tokens[lo..hi.max(lo)].to_vec();
        let indentation = compute_indentation(&tokens);
        let id = make_action_id(rev.rev_id, seq);
        seq += 1;
        new_page.insert(new_start, PageEntry::Live { action_id: id.clone(), indentation });
        actions.push(Action {
            id,
            action_type: ActionType::CommentModification,
            parent_id: Some(action_id.clone()),
            reply_to_id: None,
            indentation,
            content: tokens,
            user_id: rev.user_id.clone(),
            user_text: rev.user_text.clone(),
            timestamp: rev.timestamp,
            rev_id: rev.rev_id,
            page_id: rev.page_id.clone(),
            page_title: rev.page_title.clone(),
            conversation_id: None,
            authors: Vec::new(),
        });
    }

    // --- Phase E: detect restorations ---
    let residual_additions = apply_restorations(
        additions,
        deleted_index,
        &mut seq,
        rev,
        &mut new_page,
        &mut end_tokens,
        &mut actions,
    );

    // --- Phase F: emit remaining additions ---
    register_additions(residual_additions, &mut seq, rev, &mut new_page, &mut end_tokens, &mut actions);

    // --- Phase G: close boundaries & re-assert invariants ---
    close_boundaries(&mut new_page, &end_tokens);
    new_page.insert(new_tokens.len() as i64, PageEntry::EndOfPage);

    let page = PageState {
        page_id: rev.page_id.clone(),
        page_title: rev.page_title.clone(),
        actions: new_page,
    };
    page.validate()?;

    // --- Phase H: sort by creation order ---
    actions.sort_by_key(|a| crate::action::action_seq(&a.id));

    Ok((actions, page))
}

fn rearranged_content(rearrangements: &[(i64, i64, RemovalCandidate)], act: i64) -> Vec<Token> {
    rearrangements
        .iter()
        .find(|(k, _, _)| *k == act)
        .map(|(_, _, removal)| removal.tokens.clone())
        .unwrap_or_default()
}

fn content_len(rearrangements: &[(i64, i64, RemovalCandidate)], act: i64) -> i64 {
    rearrangements
        .iter()
        .find(|(k, _, _)| *k == act)
        .map(|(_, _, removal)| removal.tokens.len() as i64)
        .unwrap_or(0)
}

/// Phase B: match each long-enough removal against the literal text of a
/// pending addition. First match wins; matches are tried in addition order.
#[allow(clippy::type_complexity)]
fn detect_rearrangements(
    removals: Vec<RemovalCandidate>,
    mut additions: Vec<AdditionCandidate>,
    min_tokens: usize,
) -> (Vec<RemovalCandidate>, Vec<AdditionCandidate>, Vec<(i64, i64, RemovalCandidate)>) {
    let mut rearrangements = Vec::new();
    let mut final_removals = Vec::new();

    for removal in removals {
        if removal.tokens.len() <= min_tokens {
            final_removals.push(removal);
            continue;
        }
        let removed_text = join(&removal.tokens);
        let mut matched = false;
        let mut updated = Vec::new();

        for (idx, addition) in additions.iter().enumerate() {
            let inserted_text = join(&addition.tokens);
            if let Some(start_pos) = inserted_text.find(&removed_text) {
                let start_tok = tokenize(&inserted_text[..start_pos]).len();
                let end_tok = start_tok + removal.tokens.len();
                let new_offset = addition.b1 + start_tok as i64;

                if start_tok != 0 {
                    updated.push(AdditionCandidate {
                        a1: addition.a1,
                        a2: addition.a2,
                        b1: addition.b1,
                        b2: addition.b1 + start_tok as i64,
                        tokens: addition.tokens[..start_tok].to_vec(),
                        kind: addition.kind,
                    });
                }
                if end_tok != addition.tokens.len() {
                    updated.push(AdditionCandidate {
                        a1: addition.a1,
                        a2: addition.a2,
                        b1: addition.b1 + end_tok as i64,
                        b2: addition.b2,
                        tokens: addition.tokens[end_tok..].to_vec(),
                        kind: addition.kind,
                    });
                }
                updated.extend(additions[idx + 1..].iter().cloned());
                rearrangements.push((removal.old_key, new_offset, removal.clone()));
                matched = true;
                break;
            } else {
                updated.push(addition.clone());
            }
        }

        if matched {
            additions = updated;
        } else {
            final_removals.push(removal);
        }
    }

    (final_removals, additions, rearrangements)
}

/// Splits a freshly-inserted comment-sized run of tokens at heading lines,
/// producing alternating Section/Comment candidates.
fn divide_into_sections(seed: AdditionCandidate) -> Vec<AdditionCandidate> {
    let ranges = split_paragraphs(&seed.tokens);
    let mut out = Vec::new();
    let mut acc_start: Option<usize> = None;

    for (s, e) in ranges {
        let text = join(&seed.tokens[s..e]);
        if is_heading_line(&text) {
            if let Some(a_s) = acc_start.take() {
                out.push(slice_candidate(&seed, a_s, s, AdditionKind::Comment));
            }
            out.push(slice_candidate(&seed, s, e, AdditionKind::Section));
        } else if acc_start.is_none() {
            acc_start = Some(s);
        }
    }
    if let Some(a_s) = acc_start {
        out.push(slice_candidate(&seed, a_s, seed.tokens.len(), AdditionKind::Comment));
    }
    out
}

fn slice_candidate(seed: &AdditionCandidate, s: usize, e: usize, kind: AdditionKind) -> AdditionCandidate {
    AdditionCandidate {
        a1: seed.a1,
        a2: seed.a2,
        b1: seed.b1 + s as i64,
        b2: seed.b1 + e as i64,
        tokens: seed.tokens[s..e].to_vec(),
        kind,
    }
}

/// Maximal runs of tokens ending right after a break token (or at the very
/// end of `tokens`), used as the paragraph unit for heading detection.
fn split_paragraphs(tokens: &[Token]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (i, t) in tokens.iter().enumerate() {
        if t.is_break() {
            ranges.push((start, i + 1));
            start = i + 1;
        }
    }
    if start < tokens.len() {
        ranges.push((start, tokens.len()));
    }
    ranges
}

fn is_heading_line(text: &str) -> bool {
    let t = text.trim();
    t.len() >= 4 && t.starts_with("==") && t.ends_with("==")
}

/// Leading run of `:`/`*` indentation markers, the wiki-talk-page convention
/// for nesting depth.
fn compute_indentation(tokens: &[Token]) -> i64 {
    let text = join(tokens);
    let trimmed = text.trim_start_matches(|c: char| c == '\n' || c.is_whitespace());
    trimmed.chars().take_while(|&c| c == ':' || c == '*').count() as i64
}

/// The image of old-sequence offset `x` under the diff, per the
/// left/right-bound rule. Falls through to the new sequence's length when
/// `x` sits at or beyond the end of every op (the page's own EOF boundary is
/// never routed through here — see Phase G).
fn locate_new_token_pos(x: i64, ops: &[DiffOp], bound: Bound) -> i64 {
    for op in ops {
        let a1 = op.a1 as i64;
        let a2 = op.a2 as i64;
        match op.name {
            DiffName::Equal => {
                if x >= a1 && x < a2 {
                    return x + (op.b1 as i64 - a1);
                }
            }
            DiffName::Insert => {
                if x == a1 {
                    return match bound {
                        Bound::Left => op.b1 as i64,
                        Bound::Right => op.b2 as i64,
                    };
                }
            }
            DiffName::Delete => {
                if x >= a1 && x < a2 {
                    return match bound {
                        Bound::Left => op.b1 as i64,
                        Bound::Right => op.b2 as i64,
                    };
                }
            }
        }
    }
    ops.last().map(|o| o.b2 as i64).unwrap_or(0)
}

fn preceding_live_action(new_page: &BTreeMap<i64, PageEntry>, offset: i64) -> Option<String> {
    new_page
        .range(..offset)
        .next_back()
        .and_then(|(_, entry)| entry.action_id().map(str::to_string))
}

/// Phase E: match each addition's literal text against previously-removed
/// comments, splitting it into residual (still-an-addition) slices and
/// emitted restorations.
#[allow(clippy::too_many_arguments)]
fn apply_restorations(
    additions: Vec<AdditionCandidate>,
    deleted_index: &mut DeletedIndex,
    seq: &mut usize,
    rev: &Revision,
    new_page: &mut BTreeMap<i64, PageEntry>,
    end_tokens: &mut Vec<(i64, i64)>,
    actions: &mut Vec<Action>,
) -> Vec<AdditionCandidate> {
    let mut residual = Vec::new();

    for seed in additions {
        let text = join(&seed.tokens);
        let mut last_tok = 0usize;
        let mut last_pos = 0usize;

        for (k1, k2, (orig_id, orig_indent)) in deleted_index.findall_long(&text) {
            if k1 < last_pos {
                continue;
            }
            let k1_tok = last_tok + tokenize(&text[last_pos..k1]).len();
            let k2_tok = (k1_tok + tokenize(&text[k1..k2]).len()).min(seed.tokens.len());
            last_pos = k2;
            if k1_tok >= k2_tok {
                continue;
            }
            if k1_tok > last_tok {
                residual.push(slice_candidate(&seed, last_tok, k1_tok, seed.kind));
            }

            let global_start = seed.b1 + k1_tok as i64;
            let global_end = seed.b1 + k2_tok as i64;
            let id = make_action_id(rev.rev_id, *seq);
            *seq += 1;
            new_page.insert(
                global_start,
                PageEntry::Live { action_id: orig_id.clone(), indentation: orig_indent },
            );
            actions.push(Action {
                id,
                action_type: ActionType::CommentRestoration,
                parent_id: Some(orig_id),
                reply_to_id: None,
                indentation: orig_indent,
                content: seed.tokens[k1_tok..k2_tok].to_vec(),
                user_id: rev.user_id.clone(),
                user_text: rev.user_text.clone(),
                timestamp: rev.timestamp,
                rev_id: rev.rev_id,
                page_id: rev.page_id.clone(),
                page_title: rev.page_title.clone(),
                conversation_id: None,
                authors: Vec::new(),
            });
            end_tokens.push((global_start, global_end));
            last_tok = k2_tok;
        }

        if last_tok < seed.tokens.len() {
            residual.push(slice_candidate(&seed, last_tok, seed.tokens.len(), seed.kind));
        }
    }

    residual
}

/// Phase F: register every surviving addition left to right so later ones in
/// the same revision can reply to earlier ones.
fn register_additions(
    mut additions: Vec<AdditionCandidate>,
    seq: &mut usize,
    rev: &Revision,
    new_page: &mut BTreeMap<i64, PageEntry>,
    end_tokens: &mut Vec<(i64, i64)>,
    actions: &mut Vec<Action>,
) {
    additions.sort_by_key(|a| a.b1);
    for cand in additions {
        if cand.tokens.is_empty() {
            continue;
        }
        let reply_to = preceding_live_action(new_page, cand.b1);
        let indentation = compute_indentation(&cand.tokens);
        let id = make_action_id(rev.rev_id, *seq);
        *seq += 1;
        let action_type = match cand.kind {
            AdditionKind::Section => ActionType::SectionCreation,
            AdditionKind::Comment => ActionType::CommentAdding,
        };
        new_page.insert(cand.b1, PageEntry::Live { action_id: id.clone(), indentation });
        actions.push(Action {
            id,
            action_type,
            parent_id: None,
            reply_to_id: reply_to,
            indentation,
            content: cand.tokens,
            user_id: rev.user_id.clone(),
            user_text: rev.user_text.clone(),
            timestamp: rev.timestamp,
            rev_id: rev.rev_id,
            page_id: rev.page_id.clone(),
            page_title: rev.page_title.clone(),
            conversation_id: None,
            authors: Vec::new(),
        });
        end_tokens.push((cand.b1, cand.b2));
    }
}

/// Phase G: any action's end offset not already a key inherits whatever
/// entry occupied the page immediately before that action started.
fn close_boundaries(new_page: &mut BTreeMap<i64, PageEntry>, end_tokens: &[(i64, i64)]) {
    for &(start_tok, end_tok) in end_tokens {
        if new_page.contains_key(&end_tok) {
            continue;
        }
        let keys: Vec<i64> = new_page.keys().copied().collect();
        if let Some(pos) = keys.iter().position(|k| *k == start_tok) {
            if pos > 0 {
                let prev_val = new_page[&keys[pos - 1]].clone();
                new_page.insert(end_tok, prev_val);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use chrono::Utc;

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

    #[test]
    fn first_post_creates_section_and_comment() {
        let config = ReconstructConfig::default();
        let old_page = PageState::new("p1", "Talk:Example");
        let old_tokens: Vec<Token> = Vec::new();
        let r = rev(1, "== Topic ==\n:Hello world.\n");
        let new_tokens = tokenize(&r.text);
        let ops = diff(&old_tokens, &new_tokens, config.break_boundary_required);
        let mut deleted_index = DeletedIndex::new();
        let mut deleted_comments = Vec::new();

        let (actions, page) =
            classify(&r, &old_page, &ops, &new_tokens, &mut deleted_index, &mut deleted_comments, &config)
                .unwrap();

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action_type, ActionType::SectionCreation);
        assert_eq!(actions[1].action_type, ActionType::CommentAdding);
        assert_eq!(actions[1].indentation, 1);
        assert_eq!(actions[1].reply_to_id.as_deref(), Some(actions[0].id.as_str()));
        page.validate().unwrap();
    }

    #[test]
    fn reply_in_second_revision_chains_onto_first() {
        let config = ReconstructConfig::default();
        let r1 = rev(1, "== Topic ==\n:Hello world.\n");
        let old_tokens: Vec<Token> = Vec::new();
        let t1 = tokenize(&r1.text);
        let ops1 = diff(&old_tokens, &t1, config.break_boundary_required);
        let old_page = PageState::new("p1", "Talk:Example");
        let mut deleted_index = DeletedIndex::new();
        let mut deleted_comments = Vec::new();
        let (_actions1, page1) =
            classify(&r1, &old_page, &ops1, &t1, &mut deleted_index, &mut deleted_comments, &config).unwrap();

        let r2 = rev(2, "== Topic ==\n:Hello world.\n::Reply.\n");
        let t2 = tokenize(&r2.text);
        let ops2 = diff(&t1, &t2, config.break_boundary_required);
        let (actions2, page2) =
            classify(&r2, &page1, &ops2, &t2, &mut deleted_index, &mut deleted_comments, &config).unwrap();

        assert_eq!(actions2.len(), 1);
        assert_eq!(actions2[0].action_type, ActionType::CommentAdding);
        assert_eq!(actions2[0].indentation, 2);
        page2.validate().unwrap();
    }

    #[test]
    fn removal_then_restoration_round_trips_parent_id() {
        let config = ReconstructConfig::default();
        let r1 = rev(1, ":A fairly long opening remark worth keeping around.\n");
        let t1 = tokenize(&r1.text);
        let old_page = PageState::new("p1", "Talk:Example");
        let mut deleted_index = DeletedIndex::new();
        let mut deleted_comments = Vec::new();
        let ops1 = diff(&[], &t1, config.break_boundary_required);
        let (actions1, page1) =
            classify(&r1, &old_page, &ops1, &t1, &mut deleted_index, &mut deleted_comments, &config).unwrap();
        let original_id = actions1[0].id.clone();

        let r2 = rev(2, "");
        let t2: Vec<Token> = Vec::new();
        let ops2 = diff(&t1, &t2, config.break_boundary_required);
        let (actions2, page2) =
            classify(&r2, &page1, &ops2, &t2, &mut deleted_index, &mut deleted_comments, &config).unwrap();
        assert_eq!(actions2.len(), 1);
        assert_eq!(actions2[0].action_type, ActionType::CommentRemoval);
        assert_eq!(deleted_comments.len(), 1);

        let r3 = rev(3, ":A fairly long opening remark worth keeping around.\n");
        let t3 = tokenize(&r3.text);
        let ops3 = diff(&t2, &t3, config.break_boundary_required);
        let (actions3, page3) =
            classify(&r3, &page2, &ops3, &t3, &mut deleted_index, &mut deleted_comments, &config).unwrap();
        assert_eq!(actions3.len(), 1);
        assert_eq!(actions3[0].action_type, ActionType::CommentRestoration);
        assert_eq!(actions3[0].parent_id.as_deref(), Some(original_id.as_str()));
        page3.validate().unwrap();
    }
}
