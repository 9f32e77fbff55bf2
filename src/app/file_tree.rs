use std::fs;
use std::path::{Path, PathBuf};

/// One directory entry, already filtered and classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub full_path: PathBuf,
    pub is_dir: bool,
}

/// List a directory for the file browser: hidden entries (dot-prefixed) are
/// skipped, directories sort before files, each group lexicographic by name.
/// Unreadable directories come back empty after a diagnostic.
pub fn list_directory(path: &Path) -> Vec<DirEntryInfo> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Failed to read directory {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let full_path = entry.path();
        let is_dir = full_path.is_dir();
        let info = DirEntryInfo {
            name,
            full_path,
            is_dir,
        };
        if is_dir {
            dirs.push(info);
        } else {
            files.push(info);
        }
    }

    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));
    dirs.extend(files);
    dirs
}

/// Node in the lazily-populated browser tree. Unexpanded directories hold a
/// single placeholder child so the view can draw an expander arrow before the
/// directory has been read.
struct TreeNode {
    name: String,
    path: PathBuf,
    is_dir: bool,
    children: Vec<TreeNode>,
    placeholder: bool,
}

impl TreeNode {
    fn from_entry(info: DirEntryInfo) -> Self {
        let children = if info.is_dir {
            vec![TreeNode::placeholder()]
        } else {
            Vec::new()
        };
        Self {
            name: info.name,
            path: info.full_path,
            is_dir: info.is_dir,
            children,
            placeholder: false,
        }
    }

    fn placeholder() -> Self {
        Self {
            name: String::new(),
            path: PathBuf::new(),
            is_dir: false,
            children: Vec::new(),
            placeholder: true,
        }
    }

    fn is_unexpanded(&self) -> bool {
        self.children.len() == 1 && self.children[0].placeholder
    }

    /// Swap the placeholder for the directory's real entries. Re-expanding an
    /// already-expanded node is a no-op.
    fn expand(&mut self) {
        if !self.is_dir || !self.is_unexpanded() {
            return;
        }
        self.children = list_directory(&self.path)
            .into_iter()
            .map(TreeNode::from_entry)
            .collect();
    }
}

/// Flattened row handed to the view: indent depth plus the entry itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// The file browser model: a root directory and its lazily-expanded tree.
pub struct FileTree {
    root: Option<PathBuf>,
    nodes: Vec<TreeNode>,
}

impl FileTree {
    pub fn new() -> Self {
        Self {
            root: None,
            nodes: Vec::new(),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Repopulate from scratch at a new root, collapsing all expansion state.
    pub fn rebuild(&mut self, dir: &Path) {
        self.root = Some(dir.to_path_buf());
        self.nodes = list_directory(dir)
            .into_iter()
            .map(TreeNode::from_entry)
            .collect();
    }

    /// Expand the directory node at `path`, wherever it sits in the tree.
    pub fn expand(&mut self, path: &Path) {
        if let Some(node) = find_mut(&mut self.nodes, path) {
            node.expand();
        }
    }

    /// Flatten to display rows, depth-first. Placeholders never appear; an
    /// unexpanded directory simply shows as a childless dir row.
    pub fn rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        for node in &self.nodes {
            flatten(node, 0, &mut rows);
        }
        rows
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

fn find_mut<'a>(nodes: &'a mut [TreeNode], path: &Path) -> Option<&'a mut TreeNode> {
    for node in nodes {
        if node.placeholder {
            continue;
        }
        if node.path == path {
            return Some(node);
        }
        if node.is_dir && path.starts_with(&node.path) {
            return find_mut(&mut node.children, path);
        }
    }
    None
}

fn flatten(node: &TreeNode, depth: usize, rows: &mut Vec<TreeRow>) {
    if node.placeholder {
        return;
    }
    rows.push(TreeRow {
        depth,
        name: node.name.clone(),
        path: node.path.clone(),
        is_dir: node.is_dir,
    });
    if node.is_unexpanded() {
        return;
    }
    for child in &node.children {
        flatten(child, depth + 1, rows);
    }
}
