//! Category paths: `Parent/Child/Grandchild` strings used by `$CATEGORY:`.

use std::collections::{HashMap, HashSet};

use crate::models::{Category, ROOT_CATEGORY_ID};

/// Leading path segment that names the top of the hierarchy.
pub const TOP_SEGMENT: &str = "top";

/// Lookup tables over a flat category list, built once per operation.
///
/// Children keep the order in which they appear in the source slice.
#[derive(Debug)]
pub struct CategoryIndex<'a> {
    by_id: HashMap<&'a str, &'a Category>,
    children: HashMap<&'a str, Vec<&'a Category>>,
    order: Vec<&'a Category>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        let mut by_id = HashMap::with_capacity(categories.len());
        let mut children: HashMap<&str, Vec<&Category>> = HashMap::new();
        for category in categories {
            by_id.entry(category.id.as_str()).or_insert(category);
            if let Some(parent) = category.parent_id.as_deref() {
                children.entry(parent).or_default().push(category);
            }
        }
        Self {
            by_id,
            children,
            order: categories.iter().collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Category> {
        self.by_id.get(id).copied()
    }

    pub fn children(&self, id: &str) -> &[&'a Category] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories in their stored order
    pub fn iter(&self) -> impl Iterator<Item = &'a Category> + '_ {
        self.order.iter().copied()
    }

    /// Slash-joined names from the outermost ancestor down to `id`.
    ///
    /// The root sentinel is never part of a path, so the sentinel itself maps
    /// to an empty path. Returns `None` for an unknown id or when the parent
    /// chain loops.
    pub fn path_of(&self, id: &str) -> Option<String> {
        let mut names = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(self.get(id)?);

        while let Some(category) = current {
            if category.is_root() {
                break;
            }
            if !visited.insert(category.id.as_str()) {
                return None;
            }
            names.push(category.name.trim());
            current = category.parent_id.as_deref().and_then(|p| self.get(p));
        }

        names.reverse();
        Some(names.join("/"))
    }

    /// `id` followed by every child's full subtree, children in stored order.
    ///
    /// Empty when `id` is unknown. Categories already emitted are not
    /// revisited, so a malformed tree cannot loop.
    pub fn descendants_preorder(&self, id: &str) -> Vec<&'a Category> {
        let Some(start) = self.get(id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(category) = stack.pop() {
            if !visited.insert(category.id.as_str()) {
                continue;
            }
            out.push(category);
            // Reverse so the first child is popped first.
            stack.extend(self.children(&category.id).iter().rev().copied());
        }
        out
    }

    /// Ids along the first parent cycle found, in walk order.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut cleared: HashSet<&str> = HashSet::new();

        for start in &self.order {
            let mut trail: Vec<&str> = Vec::new();
            let mut on_trail: HashSet<&str> = HashSet::new();
            let mut current = Some(start.id.as_str());

            while let Some(id) = current {
                if cleared.contains(id) {
                    break;
                }
                if !on_trail.insert(id) {
                    let loop_start = trail.iter().position(|t| *t == id).unwrap_or(0);
                    return Some(trail[loop_start..].iter().map(|s| s.to_string()).collect());
                }
                trail.push(id);
                current = self.get(id).and_then(|c| c.parent_id.as_deref());
            }
            cleared.extend(trail);
        }
        None
    }

    /// Whether `ancestor_id` appears on the parent chain of `id` (or is `id`).
    pub fn is_ancestor_or_self(&self, ancestor_id: &str, id: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            if cid == ancestor_id {
                return true;
            }
            if !visited.insert(cid) {
                return false;
            }
            current = self.get(cid).and_then(|c| c.parent_id.as_deref());
        }
        false
    }
}

/// Outcome of resolving a `$CATEGORY:` path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Category the path ends at, or the root sentinel for an empty path
    pub category_id: String,
    /// Categories that did not exist yet, parents before children
    pub created: Vec<Category>,
}

/// Splits a path into its meaningful segments.
///
/// A leading `top` and empty segments are dropped; the rest are trimmed.
pub fn path_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.first() == Some(&TOP_SEGMENT) {
        segments.remove(0);
    }
    segments
}

/// Resolves `path` against `existing`, creating whatever is missing.
///
/// Matching uses exact trimmed names and exact parent ids. Nothing in
/// `existing` is modified; new categories are returned in `created`.
pub fn resolve_path(path: &str, existing: &[Category]) -> ResolvedPath {
    let mut resolver = CategoryResolver::new(existing);
    let mut created = Vec::new();
    let category_id = resolver.resolve(path, &mut created);
    ResolvedPath {
        category_id,
        created,
    }
}

/// Incremental path resolution keyed by `(parent id, trimmed name)`.
///
/// Categories created through the resolver are remembered, so resolving the
/// same path twice yields the same category.
#[derive(Debug, Default)]
pub struct CategoryResolver {
    known: HashMap<(String, String), String>,
}

impl CategoryResolver {
    pub fn new(existing: &[Category]) -> Self {
        let mut resolver = Self::default();
        for category in existing {
            resolver.remember(category);
        }
        resolver
    }

    fn remember(&mut self, category: &Category) {
        if let Some(parent) = &category.parent_id {
            self.known
                .entry((parent.clone(), category.name.trim().to_string()))
                .or_insert_with(|| category.id.clone());
        }
    }

    /// Returns the id the path ends at, pushing new categories onto `created`.
    pub fn resolve(&mut self, path: &str, created: &mut Vec<Category>) -> String {
        let mut parent_id = ROOT_CATEGORY_ID.to_string();
        for segment in path_segments(path) {
            let key = (parent_id.clone(), segment.to_string());
            parent_id = match self.known.get(&key) {
                Some(id) => id.clone(),
                None => {
                    let category = Category::new(segment, Some(parent_id));
                    log::debug!("creating category {segment:?} ({})", category.id);
                    let id = category.id.clone();
                    self.known.insert(key, id.clone());
                    created.push(category);
                    id
                }
            };
        }
        parent_id
    }
}
