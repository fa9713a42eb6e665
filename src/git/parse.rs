//! Parsers for `show-ref`, `stash list`, `log` and `show` output.
//!
//! Log and show output use a fixed pretty format whose fields are separated
//! by ASCII unit separators (`\x1F`) and whose records end with an ASCII
//! record separator (`\x1E`), so commit subjects may contain any text.

use std::collections::HashSet;

use tracing::warn;

use super::error::{ParseError, ParseWarning};
use super::model::{Commit, FileChange, Ref, RefSet, Remote, ShortStat, Stash};

/// Field separator inside a commit record.
pub const FIELD_SEPARATOR: char = '\x1F';

/// Separator terminating a commit record.
pub const RECORD_SEPARATOR: char = '\x1E';

/// Pretty format producing `hash, parents, author name, author email, date,
/// author date, subject`.
pub const COMMIT_FORMAT: &str = "%H%x1F%P%x1F%an%x1F%ae%x1F%ad%x1F%aI%x1F%s%x1E";

const FIELD_COUNT: usize = 7;

/// Parses `git show-ref --head [--dereference]` output.
///
/// Every line lands in exactly one of HEAD, branches, tags, remote HEAD or
/// remote branches. Lines that fit none of them are reported in
/// [`RefSet::warnings`] instead of being dropped silently.
#[must_use]
pub fn parse_show_ref(output: &str) -> RefSet {
    let mut refs = RefSet::default();

    for (index, raw) in output.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let Some((hash, refname)) = split_hash_line(line) else {
            refs.warnings.push(ParseWarning::MalformedLine { line_no, line: line.to_string() });
            continue;
        };

        if refname == "HEAD" {
            refs.head = Some(hash.to_string());
        } else if let Some(name) = refname.strip_prefix("refs/heads/") {
            refs.branches.push(Ref::new(name, hash));
        } else if let Some(name) = refname.strip_prefix("refs/tags/") {
            add_tag(&mut refs.tags, name, hash);
        } else if let Some(rest) = refname.strip_prefix("refs/remotes/") {
            match rest.split_once('/') {
                Some((remote, branch)) if !remote.is_empty() && !branch.is_empty() => {
                    let bucket = remote_bucket(&mut refs.remotes, remote);
                    if branch == "HEAD" {
                        bucket.head = Some(hash.to_string());
                    } else {
                        bucket.branches.push(Ref::new(branch, hash));
                    }
                }
                _ => refs.warnings.push(ParseWarning::MalformedRemoteRef {
                    line_no,
                    refname: refname.to_string(),
                }),
            }
        } else if refname == "refs/stash" {
            // Stashes come from `stash list`, which names every entry.
        } else {
            refs.warnings.push(ParseWarning::UnrecognizedRef {
                line_no,
                refname: refname.to_string(),
            });
        }
    }

    for warning in &refs.warnings {
        warn!(%warning, "skipped show-ref line");
    }
    refs
}

/// Parses `git stash list --format='%H %gd'` output.
#[must_use]
pub fn parse_stash_list(output: &str) -> Vec<Stash> {
    let mut stashes = Vec::new();
    for (index, raw) in output.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        match split_hash_line(line) {
            Some((hash, name)) => {
                stashes.push(Stash { name: name.to_string(), hash: hash.to_string() });
            }
            None => {
                let warning =
                    ParseWarning::MalformedLine { line_no: index + 1, line: line.to_string() };
                warn!(%warning, "skipped stash list line");
            }
        }
    }
    stashes
}

/// Parses `git log` output produced with [`COMMIT_FORMAT`].
///
/// Commits matching a stash entry are tagged with the stash name, and the
/// stash's second and third parents (its index and untracked snapshots) are
/// removed. The remaining commits keep git's order.
///
/// # Errors
///
/// Returns [`ParseError::TruncatedRecord`] when a record has fewer than seven fields.
pub fn parse_log(output: &str, stashes: &[Stash]) -> Result<Vec<Commit>, ParseError> {
    let mut commits = Vec::new();
    for (index, record) in records(output).enumerate() {
        commits.push(parse_commit_record(record, index)?);
    }

    let mut hidden: HashSet<String> = HashSet::new();
    for stash in stashes {
        if let Some(commit) = commits.iter_mut().find(|c| c.hash == stash.hash) {
            commit.stash = Some(stash.name.clone());
            hidden.extend(commit.parents.iter().skip(1).take(2).cloned());
        }
    }

    if !hidden.is_empty() {
        commits.retain(|commit| !hidden.contains(&commit.hash));
    }
    Ok(commits)
}

/// Parses `git show --name-status` output produced with [`COMMIT_FORMAT`].
///
/// # Errors
///
/// Returns [`ParseError::MissingRecord`] for empty output, a truncation error
/// for an incomplete record, or [`ParseError::MalformedFileLine`] for a file
/// status line without a path.
pub fn parse_show(output: &str) -> Result<Commit, ParseError> {
    let (commit_group, file_group) =
        output.split_once(RECORD_SEPARATOR).unwrap_or((output, ""));
    let record = commit_group.trim_start_matches(['\r', '\n']);
    if record.trim().is_empty() {
        return Err(ParseError::MissingRecord);
    }

    let mut commit = parse_commit_record(record, 0)?;
    let mut files = Vec::new();
    for raw in file_group.lines() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        files.push(parse_file_line(line)?);
    }
    commit.files = Some(files);
    Ok(commit)
}

/// Parses the summary line of `git show --shortstat`.
///
/// Returns `None` when the output has no summary (e.g. an empty commit).
#[must_use]
pub fn parse_short_stat(output: &str) -> Option<ShortStat> {
    let line = output.lines().map(str::trim).find(|line| line.contains(" changed"))?;
    let mut stat = ShortStat::default();
    for part in line.split(',') {
        let mut words = part.split_whitespace();
        let Some(count) = words.next().and_then(|n| n.parse::<u32>().ok()) else {
            continue;
        };
        match words.next() {
            Some(word) if word.starts_with("file") => stat.files = count,
            Some(word) if word.starts_with("insertion") => stat.insertions = count,
            Some(word) if word.starts_with("deletion") => stat.deletions = count,
            _ => {}
        }
    }
    Some(stat)
}

fn split_hash_line(line: &str) -> Option<(&str, &str)> {
    let (hash, name) = line.split_once(' ')?;
    let name = name.trim();
    if hash.is_empty() || name.is_empty() {
        return None;
    }
    Some((hash, name))
}

fn add_tag(tags: &mut Vec<Ref>, name: &str, hash: &str) {
    if let Some(tag_name) = name.strip_suffix("^{}") {
        // Peeled line: the tag object resolves to this commit.
        match tags.iter_mut().find(|tag| tag.name == tag_name) {
            Some(tag) => tag.hash = hash.to_string(),
            None => tags.push(Ref::new(tag_name, hash)),
        }
    } else {
        tags.push(Ref::new(name, hash));
    }
}

fn remote_bucket<'a>(remotes: &'a mut Vec<Remote>, name: &str) -> &'a mut Remote {
    let position = match remotes.iter().position(|remote| remote.name == name) {
        Some(position) => position,
        None => {
            remotes.push(Remote::new(name));
            remotes.len() - 1
        }
    };
    &mut remotes[position]
}

fn records(output: &str) -> impl Iterator<Item = &str> {
    output
        .split(RECORD_SEPARATOR)
        .map(|record| record.trim_start_matches(['\r', '\n']))
        .filter(|record| !record.trim().is_empty())
}

fn parse_commit_record(record: &str, index: usize) -> Result<Commit, ParseError> {
    let fields: Vec<&str> = record.splitn(FIELD_COUNT, FIELD_SEPARATOR).collect();
    let &[hash, parents, author_name, author_email, commit_date, author_date, message] =
        fields.as_slice()
    else {
        return Err(ParseError::TruncatedRecord { index, fields: fields.len() });
    };

    Ok(Commit {
        hash: hash.trim().to_string(),
        message: message.to_string(),
        parents: parents.split_whitespace().map(String::from).collect(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        commit_date: commit_date.to_string(),
        author_date: Some(author_date.trim()).filter(|d| !d.is_empty()).map(String::from),
        short_stat: None,
        files: None,
        stash: None,
    })
}

fn parse_file_line(line: &str) -> Result<FileChange, ParseError> {
    let mut parts = line.split('\t');
    let status = parts.next().unwrap_or_default().trim();
    let first = parts.next().filter(|path| !path.is_empty());
    let second = parts.next().filter(|path| !path.is_empty());

    let (path, old_path) = match (first, second) {
        (Some(old), Some(new)) if status.starts_with(['R', 'C']) => {
            (new.to_string(), Some(old.to_string()))
        }
        (Some(path), _) if !status.is_empty() => (path.to_string(), None),
        _ => return Err(ParseError::MalformedFileLine { line: line.to_string() }),
    };

    Ok(FileChange { path, status: status.to_string(), old_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(hash: &str, parents: &str, subject: &str) -> String {
        let author = "ann\x1Fann@example.com";
        let date = "2024-05-01T10:00:00+02:00";
        format!("{hash}\x1F{parents}\x1F{author}\x1F{date}\x1F{date}\x1F{subject}\x1E")
    }

    fn stash(name: &str, hash: &str) -> Stash {
        Stash { name: name.into(), hash: hash.into() }
    }

    #[test]
    fn show_ref_classifies_head_and_branch() {
        let refs = parse_show_ref("abc123 refs/heads/main\nabc123 HEAD\n");
        assert_eq!(refs.head.as_deref(), Some("abc123"));
        assert_eq!(refs.branches, vec![Ref::new("main", "abc123")]);
        assert!(refs.tags.is_empty());
        assert!(refs.remotes.is_empty());
        assert!(refs.warnings.is_empty());
    }

    #[test]
    fn show_ref_partitions_every_category() {
        let output = "\
h0 HEAD
h1 refs/heads/main
h2 refs/heads/feature/graph
h3 refs/tags/v1.0
h4 refs/remotes/origin/HEAD
h5 refs/remotes/origin/main
h6 refs/remotes/origin/feature/graph
h7 refs/remotes/upstream/main
";
        let refs = parse_show_ref(output);
        assert_eq!(refs.head.as_deref(), Some("h0"));
        assert_eq!(
            refs.branches,
            vec![Ref::new("main", "h1"), Ref::new("feature/graph", "h2")]
        );
        assert_eq!(refs.tags, vec![Ref::new("v1.0", "h3")]);
        assert_eq!(refs.remotes.len(), 2);
        assert_eq!(refs.remotes[0].name, "origin");
        assert_eq!(refs.remotes[0].head.as_deref(), Some("h4"));
        assert_eq!(
            refs.remotes[0].branches,
            vec![Ref::new("main", "h5"), Ref::new("feature/graph", "h6")]
        );
        assert_eq!(refs.remotes[1].name, "upstream");
        assert_eq!(refs.remotes[1].head, None);
        assert_eq!(refs.remotes[1].branches, vec![Ref::new("main", "h7")]);

        let classified = 1
            + refs.branches.len()
            + refs.tags.len()
            + refs
                .remotes
                .iter()
                .map(|r| r.branches.len() + usize::from(r.head.is_some()))
                .sum::<usize>();
        assert_eq!(classified, output.lines().count());
    }

    #[test]
    fn show_ref_reports_malformed_remote_instead_of_dropping() {
        let refs = parse_show_ref("h1 refs/remotes/origin\nh2 refs/heads/main\n");
        assert_eq!(refs.branches, vec![Ref::new("main", "h2")]);
        assert_eq!(
            refs.warnings,
            vec![ParseWarning::MalformedRemoteRef {
                line_no: 1,
                refname: "refs/remotes/origin".into()
            }]
        );
    }

    #[test]
    fn show_ref_reports_lines_without_ref_name() {
        let refs = parse_show_ref("deadbeef\n");
        assert_eq!(
            refs.warnings,
            vec![ParseWarning::MalformedLine { line_no: 1, line: "deadbeef".into() }]
        );
    }

    #[test]
    fn show_ref_peels_annotated_tags() {
        let refs = parse_show_ref("tagobj refs/tags/v2\ncommit2 refs/tags/v2^{}\n");
        assert_eq!(refs.tags, vec![Ref::new("v2", "commit2")]);
    }

    #[test]
    fn show_ref_skips_stash_and_flags_other_namespaces() {
        let refs = parse_show_ref("s1 refs/stash\nn1 refs/notes/commits\n");
        assert_eq!(
            refs.warnings,
            vec![ParseWarning::UnrecognizedRef { line_no: 2, refname: "refs/notes/commits".into() }]
        );
    }

    #[test]
    fn stash_list_splits_on_first_space() {
        let stashes = parse_stash_list("aaa stash@{0}\nbbb stash@{1}\n\n");
        assert_eq!(stashes, vec![stash("stash@{0}", "aaa"), stash("stash@{1}", "bbb")]);
    }

    #[test]
    fn stash_list_skips_malformed_lines() {
        assert!(parse_stash_list("garbage\n").is_empty());
    }

    #[test]
    fn log_root_commit_has_no_parents() {
        let commits = parse_log("h1\x1F\x1Fa\x1Fa@x\x1Fd1\x1F\x1Fmsg1\x1E", &[]).unwrap();
        assert_eq!(
            commits,
            vec![Commit {
                hash: "h1".into(),
                message: "msg1".into(),
                parents: vec![],
                author_name: "a".into(),
                author_email: "a@x".into(),
                commit_date: "d1".into(),
                author_date: None,
                short_stat: None,
                files: None,
                stash: None,
            }]
        );
    }

    #[test]
    fn log_keeps_order_and_parents() {
        let output =
            [record("c3", "c2 c1", "merge"), record("c2", "c1", "two"), record("c1", "", "one")]
                .join("\n");
        let commits = parse_log(&output, &[]).unwrap();
        let hashes: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, ["c3", "c2", "c1"]);
        assert_eq!(commits[0].parents, ["c2", "c1"]);
        assert_eq!(commits[0].message, "merge");
        assert_eq!(commits[0].author_date.as_deref(), Some("2024-05-01T10:00:00+02:00"));
    }

    #[test]
    fn log_filters_stash_index_commit() {
        let output = [
            record("s1", "c1 i1", "WIP on main"),
            record("i1", "c1", "index on main"),
            record("c1", "", "initial"),
        ]
        .join("\n");
        let commits = parse_log(&output, &[stash("stash@{0}", "s1")]).unwrap();
        let hashes: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, ["s1", "c1"]);
        assert_eq!(commits[0].stash.as_deref(), Some("stash@{0}"));
    }

    #[test]
    fn log_filters_stash_untracked_commit() {
        let output = [
            record("s1", "c1 i1 u1", "WIP on main"),
            record("u1", "", "untracked files on main"),
            record("i1", "c1", "index on main"),
            record("c1", "", "initial"),
        ]
        .join("\n");
        let commits = parse_log(&output, &[stash("stash@{0}", "s1")]).unwrap();
        let hashes: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, ["s1", "c1"]);
    }

    #[test]
    fn log_ignores_stash_entries_missing_from_output() {
        let output = record("c1", "", "initial");
        let commits = parse_log(&output, &[stash("stash@{3}", "gone")]).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].stash, None);
    }

    #[test]
    fn log_subject_keeps_extra_separators() {
        let output = "h1\x1F\x1Fa\x1Fa@x\x1Fd1\x1Fd2\x1Fodd\x1Fsubject\x1E";
        let commits = parse_log(output, &[]).unwrap();
        assert_eq!(commits[0].message, "odd\x1Fsubject");
    }

    #[test]
    fn log_rejects_truncated_record() {
        let output = format!("{}\nh2\x1Fh1\x1Fa\x1E", record("h1", "", "ok"));
        assert_eq!(
            parse_log(&output, &[]),
            Err(ParseError::TruncatedRecord { index: 1, fields: 3 })
        );
    }

    #[test]
    fn log_of_empty_output_is_empty() {
        assert_eq!(parse_log("", &[]), Ok(vec![]));
        assert_eq!(parse_log("\n", &[]), Ok(vec![]));
    }

    #[test]
    fn parsing_is_idempotent() {
        let output =
            [record("s1", "c1 i1", "WIP"), record("i1", "c1", "index"), record("c1", "", "init")]
                .join("\n");
        let stashes = [stash("stash@{0}", "s1")];
        assert_eq!(parse_log(&output, &stashes), parse_log(&output, &stashes));

        let refs = "h1 refs/heads/main\nh1 HEAD\nh2 refs/remotes/origin/main\n";
        assert_eq!(parse_show_ref(refs), parse_show_ref(refs));
    }

    #[test]
    fn show_preserves_file_order() {
        let output = format!(
            "{}\nM\tsrc/lib.rs\nA\tsrc/git/parse.rs\n\nD\tREADME.old\nR087\tsrc/old.rs\tsrc/new.rs\n",
            record("h2", "h1", "change files")
        );
        let commit = parse_show(&output).unwrap();
        assert_eq!(commit.hash, "h2");
        assert_eq!(commit.parents, ["h1"]);
        assert_eq!(
            commit.files.unwrap(),
            vec![
                FileChange { path: "src/lib.rs".into(), status: "M".into(), old_path: None },
                FileChange { path: "src/git/parse.rs".into(), status: "A".into(), old_path: None },
                FileChange { path: "README.old".into(), status: "D".into(), old_path: None },
                FileChange {
                    path: "src/new.rs".into(),
                    status: "R087".into(),
                    old_path: Some("src/old.rs".into())
                },
            ]
        );
    }

    #[test]
    fn show_without_file_section_has_empty_files() {
        let commit = parse_show(&record("h1", "", "empty")).unwrap();
        assert_eq!(commit.files, Some(vec![]));
    }

    #[test]
    fn show_of_empty_output_is_missing_record() {
        assert_eq!(parse_show(""), Err(ParseError::MissingRecord));
    }

    #[test]
    fn show_rejects_file_line_without_path() {
        let output = format!("{}\nM\n", record("h1", "", "broken"));
        assert_eq!(
            parse_show(&output),
            Err(ParseError::MalformedFileLine { line: "M".into() })
        );
    }

    #[test]
    fn short_stat_reads_all_counts() {
        let stat = parse_short_stat("\n 3 files changed, 10 insertions(+), 1 deletion(-)\n");
        assert_eq!(stat, Some(ShortStat { files: 3, insertions: 10, deletions: 1 }));
    }

    #[test]
    fn short_stat_tolerates_missing_parts() {
        let stat = parse_short_stat(" 1 file changed, 2 deletions(-)\n");
        assert_eq!(stat, Some(ShortStat { files: 1, insertions: 0, deletions: 2 }));
        assert_eq!(parse_short_stat(""), None);
    }
}
