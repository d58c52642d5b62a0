//! Plain-text rendering of a project, chapter or scene for download.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{Chapter, Project, Scene};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

pub fn export_project(project: &Project) -> ExportArtifact {
    ExportArtifact {
        file_name: file_name_for(&project.title),
        contents: project_text(project),
    }
}

pub fn export_chapter(chapter: &Chapter) -> ExportArtifact {
    ExportArtifact {
        file_name: file_name_for(&chapter.title),
        contents: chapter_text(chapter),
    }
}

pub fn export_scene(scene: &Scene) -> ExportArtifact {
    ExportArtifact {
        file_name: file_name_for(&scene.title),
        contents: scene_text(scene),
    }
}

/// Whole manuscript, chapters and scenes in `order` sequence.
pub fn project_text(project: &Project) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("# ");
    out.push_str(&project.title);
    out.push('\n');
    if !project.description.is_empty() {
        out.push('\n');
        out.push_str(&project.description);
        out.push('\n');
    }
    for chapter in project.ordered_chapters() {
        out.push('\n');
        push_chapter(&mut out, chapter);
    }
    out
}

pub fn chapter_text(chapter: &Chapter) -> String {
    let mut out = String::with_capacity(2048);
    push_chapter(&mut out, chapter);
    out
}

pub fn scene_text(scene: &Scene) -> String {
    let mut out = String::with_capacity(scene.content.len() + 64);
    push_scene(&mut out, scene);
    out
}

fn push_chapter(out: &mut String, chapter: &Chapter) {
    out.push_str("## ");
    out.push_str(&chapter.title);
    out.push('\n');
    for scene in chapter.ordered_scenes() {
        out.push('\n');
        push_scene(out, scene);
    }
}

fn push_scene(out: &mut String, scene: &Scene) {
    out.push_str("### ");
    out.push_str(&scene.title);
    out.push_str("\n\n");
    out.push_str(&scene.content);
    if !scene.content.ends_with('\n') {
        out.push('\n');
    }
}

/// Title reduced to characters that are safe in a file name, plus `.txt`.
pub fn file_name_for(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('_');
    if cleaned.is_empty() {
        "untitled.txt".to_string()
    } else {
        format!("{cleaned}.txt")
    }
}

/// Write an artifact into `dir`, creating it if needed. Returns the file path.
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.contents)?;
    Ok(path)
}
