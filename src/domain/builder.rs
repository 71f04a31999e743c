//! Family tree builder: grows the arena from `Parent: Child, Child` lines and
//! answers most-recent-common-ancestor queries.

use std::collections::HashSet;
use std::fmt;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeRef, TreeArena};
use crate::domain::error::{LookupError, ParseError};

/// Result type for tree construction.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for tree queries.
pub type LookupResult<T> = Result<T, LookupError>;

/// Knobs for how strictly input lines are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept child names that already exist in the tree (lookups then pick the
    /// pre-order first match)
    pub allow_duplicates: bool,
    /// Accept a parent name that trims to the empty string
    pub allow_empty_parent: bool,
    /// Skip blank lines and `#` comment lines instead of failing on them
    pub skip_blank_lines: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_duplicates: false,
            allow_empty_parent: true,
            skip_blank_lines: false,
        }
    }
}

/// One input line split into its parent name and child names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub parent: &'a str,
    pub children: Vec<&'a str>,
}

/// Split `line` at its first colon.
///
/// Both sides are trimmed; the right side is split on commas and empty tokens
/// are dropped.
pub fn parse_line(line: &str, line_number: usize) -> ParseResult<ParsedLine<'_>> {
    let (parent, children) = line
        .split_once(':')
        .ok_or_else(|| ParseError::MissingColon {
            line_number,
            line: line.to_string(),
        })?;

    Ok(ParsedLine {
        parent: parent.trim(),
        children: children
            .split(',')
            .map(str::trim)
            .filter(|child| !child.is_empty())
            .collect(),
    })
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// A family tree built line by line.
///
/// The first consumed line fixes the root. Every later line must name an
/// existing node as its parent. Lines are validated completely before the tree
/// is touched, so a failing line leaves the tree as it was.
#[derive(Debug, Default)]
pub struct FamilyTree {
    arena: TreeArena,
    options: ParseOptions,
    names: HashSet<String>,
    lines_consumed: usize,
}

impl FamilyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Build a tree from `lines` with default options, stopping at the first
    /// malformed line.
    pub fn build<I, S>(lines: I) -> ParseResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_with_options(lines, ParseOptions::default())
    }

    pub fn build_with_options<I, S>(lines: I, options: ParseOptions) -> ParseResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::with_options(options);
        tree.consume_lines(lines)?;
        Ok(tree)
    }

    /// Feed `lines` in order. On error the tree keeps everything consumed before
    /// the failing line.
    pub fn consume_lines<I, S>(&mut self, lines: I) -> ParseResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.consume_line(line.as_ref())?;
        }
        debug!(
            lines = self.lines_consumed,
            nodes = self.arena.len(),
            "consumed lines"
        );
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn consume_line(&mut self, line: &str) -> ParseResult<()> {
        self.lines_consumed += 1;
        let line_number = self.lines_consumed;

        if self.options.skip_blank_lines && is_blank_or_comment(line) {
            trace!(line_number, "skipping blank line");
            return Ok(());
        }

        let parsed = parse_line(line, line_number)?;
        if parsed.parent.is_empty() && !self.options.allow_empty_parent {
            return Err(ParseError::EmptyParentName { line_number });
        }

        let parent = match self.arena.root() {
            None => None,
            Some(_) => Some(self.arena.find_by_name(parsed.parent).ok_or_else(|| {
                ParseError::ParentNotFound {
                    line_number,
                    name: parsed.parent.to_string(),
                }
            })?),
        };

        if !self.options.allow_duplicates {
            self.check_duplicates(&parsed, parent.is_none(), line_number)?;
        }

        let parent_idx = match parent {
            Some(idx) => idx,
            None => {
                debug!(root = parsed.parent, "establishing root");
                self.arena.add_root(parsed.parent)
            }
        };
        self.names.insert(parsed.parent.to_string());

        for child in parsed.children {
            self.arena.add_child(parent_idx, child);
            self.names.insert(child.to_string());
        }
        Ok(())
    }

    fn check_duplicates(
        &self,
        parsed: &ParsedLine<'_>,
        creates_root: bool,
        line_number: usize,
    ) -> ParseResult<()> {
        let mut seen = HashSet::new();
        if creates_root {
            seen.insert(parsed.parent);
        }
        for &child in &parsed.children {
            if self.names.contains(child) || !seen.insert(child) {
                return Err(ParseError::DuplicateName {
                    line_number,
                    name: child.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    /// Number of lines fed so far, including a failing one.
    pub fn lines_consumed(&self) -> usize {
        self.lines_consumed
    }

    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.arena.root().and_then(|idx| self.arena.node_ref(idx))
    }

    pub fn find(&self, name: &str) -> Option<NodeRef<'_>> {
        self.arena
            .find_by_name(name)
            .and_then(|idx| self.arena.node_ref(idx))
    }

    fn resolve(&self, name: &str) -> LookupResult<Index> {
        self.arena
            .find_by_name(name)
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }

    /// Ancestors of the node named `name`, nearest first, root last.
    #[instrument(level = "debug", skip(self))]
    pub fn ancestors(&self, name: &str) -> LookupResult<Vec<NodeRef<'_>>> {
        let idx = self.resolve(name)?;
        Ok(self
            .arena
            .ancestor_chain(idx)
            .into_iter()
            .filter_map(|ancestor| self.arena.node_ref(ancestor))
            .collect())
    }

    /// Deepest node that is a proper ancestor of both named nodes.
    ///
    /// A node is never its own ancestor: asking about the same node twice yields
    /// its parent, and the root paired with itself has no common ancestor.
    #[instrument(level = "debug", skip(self))]
    pub fn most_recent_common_ancestor(
        &self,
        first: &str,
        second: &str,
    ) -> LookupResult<NodeRef<'_>> {
        let first_idx = self.resolve(first)?;
        let second_idx = self.resolve(second)?;

        let first_chain = self.arena.ancestor_chain(first_idx);
        let second_chain = self.arena.ancestor_chain(second_idx);

        let found = first_chain
            .into_iter()
            .find(|idx| second_chain.contains(idx))
            .and_then(|idx| self.arena.node_ref(idx));

        match found {
            Some(ancestor) => {
                debug!(ancestor = ancestor.name(), "found common ancestor");
                Ok(ancestor)
            }
            None => Err(LookupError::NoCommonAncestor {
                first: first.to_string(),
                second: second.to_string(),
            }),
        }
    }

    /// Indented listing of the whole tree.
    pub fn render(&self) -> String {
        self.arena.to_string()
    }
}

impl fmt::Display for FamilyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Family Tree:\n\n{}", self.arena)
    }
}
