use serde::{Deserialize, Serialize};

use crate::grid::{GridSize, DEFAULT_GRID};

pub const LEVELS_PER_CHAPTER: u32 = 24;
pub const TOTAL_CHAPTERS: u32 = 20;

/// Grid size by 1-based level id: the first third of a chapter plays 3x4,
/// the middle third 4x5, the rest 5x6.
pub fn grid_size_for_level(level_id: u32) -> GridSize {
    if level_id <= 8 {
        GridSize::new(3, 4)
    } else if level_id <= 16 {
        GridSize::new(4, 5)
    } else {
        GridSize::new(5, 6)
    }
}

/// Grid size as stored in catalog documents: either the full form or the
/// legacy single number N meaning N columns by N+1 rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridSizeHint {
    Full(GridSize),
    Legacy(u32),
}

pub fn normalize_grid_size(hint: Option<GridSizeHint>) -> GridSize {
    match hint {
        Some(GridSizeHint::Full(size)) => size,
        Some(GridSizeHint::Legacy(cols)) => GridSize::new(cols, cols + 1),
        None => DEFAULT_GRID,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelInfo {
    pub id: u32,
    pub chapter_id: u32,
    #[serde(default)]
    pub grid_size: Option<GridSizeHint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterInfo {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub levels: Vec<LevelInfo>,
}

/// Read-only chapter/level catalog. Chapters and levels are sorted by
/// numeric id at construction; nothing downstream depends on the order the
/// backing documents arrived in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    chapters: Vec<ChapterInfo>,
}

impl Catalog {
    pub fn new(mut chapters: Vec<ChapterInfo>) -> Self {
        chapters.sort_by_key(|chapter| chapter.id);
        for chapter in &mut chapters {
            chapter.levels.sort_by_key(|level| level.id);
        }
        Self { chapters }
    }

    /// A full default catalog with grid sizes derived from the level id.
    pub fn generated() -> Self {
        let chapters = (1..=TOTAL_CHAPTERS)
            .map(|chapter_id| ChapterInfo {
                id: chapter_id,
                name: format!("Chapter {chapter_id}"),
                levels: (1..=LEVELS_PER_CHAPTER)
                    .map(|level_id| LevelInfo {
                        id: level_id,
                        chapter_id,
                        grid_size: Some(GridSizeHint::Full(grid_size_for_level(level_id))),
                    })
                    .collect(),
            })
            .collect();
        Self::new(chapters)
    }

    pub fn chapters(&self) -> &[ChapterInfo] {
        &self.chapters
    }

    pub fn chapter_by_id(&self, chapter_id: u32) -> Option<&ChapterInfo> {
        self.chapters.iter().find(|chapter| chapter.id == chapter_id)
    }

    pub fn level_by_id(&self, chapter_id: u32, level_id: u32) -> Option<&LevelInfo> {
        self.chapter_by_id(chapter_id)?
            .levels
            .iter()
            .find(|level| level.id == level_id)
    }

    pub fn grid_size_for(&self, chapter_id: u32, level_id: u32) -> GridSize {
        match self.level_by_id(chapter_id, level_id) {
            Some(level) => normalize_grid_size(level.grid_size),
            None => grid_size_for_level(level_id),
        }
    }

    pub fn levels_in_chapter(&self, chapter_id: u32) -> u32 {
        self.chapter_by_id(chapter_id)
            .map(|chapter| chapter.levels.len() as u32)
            .unwrap_or(LEVELS_PER_CHAPTER)
    }
}
