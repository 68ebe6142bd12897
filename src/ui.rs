use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table, Widget},
};
use strum::IntoEnumIterator;

use crate::{
    app::Mode,
    catalog::{FileKind, FolderId},
    config::Styles,
    view::{BrowserView, FileRow, SidebarEntry},
};

const SIDEBAR_WIDTH: u16 = 26;
/// Rows between the top of the sidebar and the first folder entry.
const FOLDER_ROW_OFFSET: u16 = 2;

const DRIVE_ICON: &str = "\u{f0a0}";
const FOLDER_ICON: &str = "\u{f07b}";
const FOLDER_OPEN_ICON: &str = "\u{f07c}";
const EXPANDED: &str = "▾";
const COLLAPSED: &str = "▸";
const OVERFLOW: &str = "⋮";

/// Entries below the folders; they are drawn but do nothing.
const SHORTCUTS: [(&str, &str); 3] = [
    ("\u{f017}", "Recent"),
    ("\u{f005}", "Starred"),
    ("\u{f1f8}", "Trash"),
];

/// Resolved styles for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub selected: Style,
    pub folder: Style,
    pub selected_folder: Style,
    pub header: Style,
    pub column_header: Style,
    pub muted: Style,
    pub document: Style,
    pub image: Style,
    pub audio: Style,
    pub video: Style,
    pub other: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            selected: Style::new()
                .fg(Color::Blue)
                .bg(Color::Indexed(67))
                .add_modifier(Modifier::BOLD),
            folder: Style::new().fg(Color::Gray),
            selected_folder: Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD),
            header: Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
            column_header: Style::new().fg(Color::Gray),
            muted: Style::new().fg(Color::Gray),
            document: Style::new().fg(Color::Blue),
            image: Style::new().fg(Color::Green),
            audio: Style::new().fg(Color::Magenta),
            video: Style::new().fg(Color::Red),
            other: Style::new().fg(Color::Gray),
        }
    }
}

impl Palette {
    /// Takes every style the config names for `mode`, keeping defaults for the rest.
    pub fn from_styles(styles: &Styles, mode: Mode) -> Self {
        let mut palette = Self::default();
        let Some(named) = styles.get(&mode) else {
            return palette;
        };
        for (name, style) in named {
            let slot = match name.as_str() {
                "selected" => &mut palette.selected,
                "folder" => &mut palette.folder,
                "selected_folder" => &mut palette.selected_folder,
                "header" => &mut palette.header,
                "column_header" => &mut palette.column_header,
                "muted" => &mut palette.muted,
                "document" => &mut palette.document,
                "image" => &mut palette.image,
                "audio" => &mut palette.audio,
                "video" => &mut palette.video,
                "other" => &mut palette.other,
                _ => continue,
            };
            *slot = *style;
        }
        palette
    }

    fn kind(&self, kind: FileKind) -> Style {
        match kind {
            FileKind::Document => self.document,
            FileKind::Image => self.image,
            FileKind::Audio => self.audio,
            FileKind::Video => self.video,
            FileKind::Other => self.other,
        }
    }
}

pub fn kind_icon(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Document => "\u{f0f6}",
        FileKind::Image => "\u{f1c5}",
        FileKind::Audio => "\u{f1c7}",
        FileKind::Video => "\u{f1c8}",
        FileKind::Other => "\u{f016}",
    }
}

struct Areas {
    sidebar: Rect,
    header: Rect,
    table: Rect,
    footer: Rect,
}

fn split(area: Rect) -> Areas {
    let [main_area, footer] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
    let [sidebar, content] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
            .areas(main_area);
    let [header, table] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(content);
    Areas {
        sidebar,
        header,
        table,
        footer,
    }
}

fn sidebar_block() -> Block<'static> {
    Block::new()
        .borders(Borders::RIGHT)
        .padding(Padding::horizontal(1))
}

/// Rows of the folder entries, one per [`FolderId`] in display order.
fn folder_rows(sidebar: Rect) -> impl Iterator<Item = (FolderId, Rect)> {
    let inner = sidebar_block().inner(sidebar);
    FolderId::iter()
        .zip(0u16..)
        .map(move |(folder, i)| {
            let row = Rect::new(inner.x, inner.y + FOLDER_ROW_OFFSET + i, inner.width, 1);
            (folder, row.intersection(inner))
        })
        .filter(|(_, row)| !row.is_empty())
}

pub fn render(view: &BrowserView, palette: &Palette, hint: &str, area: Rect, buf: &mut Buffer) {
    let areas = split(area);

    render_sidebar(&view.sidebar, palette, areas.sidebar, buf);
    render_header(view.header, palette, areas.header, buf);
    render_table(&view.rows, palette, areas.table, buf);
    render_footer(hint, palette, areas.footer, buf);
}

/// Maps a terminal cell back to the folder entry drawn there, if any.
pub fn sidebar_hit(area: Rect, column: u16, row: u16) -> Option<FolderId> {
    let position = Position::new(column, row);
    folder_rows(split(area).sidebar)
        .find(|(_, rect)| rect.contains(position))
        .map(|(folder, _)| folder)
}

fn render_sidebar(entries: &[SidebarEntry], palette: &Palette, area: Rect, buf: &mut Buffer) {
    let block = sidebar_block();
    let inner = block.inner(area);
    block.render(area, buf);

    Line::from(vec![
        Span::raw(DRIVE_ICON),
        Span::raw(" "),
        Span::raw("File Explorer"),
    ])
    .style(palette.muted.add_modifier(Modifier::BOLD))
    .render(inner, buf);

    let mut last_folder_row = inner.y;
    for ((folder, row), entry) in folder_rows(area).zip(entries) {
        debug_assert_eq!(folder, entry.folder);
        let chevron = if entry.expanded { EXPANDED } else { COLLAPSED };
        let (icon, icon_style) = if entry.selected {
            (FOLDER_OPEN_ICON, palette.selected_folder)
        } else {
            (FOLDER_ICON, palette.folder)
        };
        let line = Line::from(vec![
            Span::raw(chevron),
            Span::raw(" "),
            Span::styled(icon, icon_style),
            Span::raw(" "),
            Span::raw(entry.label),
        ]);
        if entry.selected {
            buf.set_style(row, palette.selected);
            line.style(palette.selected).render(row, buf);
        } else {
            line.render(row, buf);
        }
        last_folder_row = row.y;
    }

    let shortcuts_top = last_folder_row + 2;
    for ((icon, label), i) in SHORTCUTS.iter().zip(0u16..) {
        let row = Rect::new(inner.x, shortcuts_top + i, inner.width, 1).intersection(inner);
        if row.is_empty() {
            break;
        }
        Line::from(vec![Span::raw(*icon), Span::raw(" "), Span::raw(*label)])
            .style(palette.muted)
            .render(row, buf);
    }
}

fn render_header(title: &str, palette: &Palette, area: Rect, buf: &mut Buffer) {
    Paragraph::new(title)
        .style(palette.header)
        .block(Block::new().borders(Borders::BOTTOM).padding(Padding::horizontal(2)))
        .render(area, buf);
}

fn render_table(rows: &[FileRow], palette: &Palette, area: Rect, buf: &mut Buffer) {
    let header = Row::new(["Name", "Size", "Modified", ""]).style(palette.column_header);

    let rows = rows.iter().map(|row| {
        let name = Line::from(vec![
            Span::styled(kind_icon(row.kind), palette.kind(row.kind)),
            Span::raw("  "),
            Span::raw(row.name.as_str()),
        ]);
        Row::new([
            Cell::from(name),
            Cell::from(row.size.as_str()).style(palette.muted),
            Cell::from(row.modified.as_str()).style(palette.muted),
            Cell::from(Line::from(OVERFLOW).right_aligned()).style(palette.muted),
        ])
    });

    let widths = [
        Constraint::Fill(6),
        Constraint::Fill(2),
        Constraint::Fill(3),
        Constraint::Fill(1),
    ];
    Table::new(rows, widths)
        .header(header)
        .block(Block::bordered().padding(Padding::horizontal(1)))
        .render(
            Rect {
                x: area.x + 1,
                width: area.width.saturating_sub(2),
                ..area
            },
            buf,
        );
}

fn render_footer(hint: &str, palette: &Palette, area: Rect, buf: &mut Buffer) {
    Paragraph::new(hint.italic())
        .style(palette.muted)
        .centered()
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        catalog::{Catalog, FileRecord},
        view::{ViewState, project},
    };

    fn draw(state: &ViewState, width: u16, height: u16) -> Buffer {
        draw_with(&Catalog::seed(), state, width, height)
    }

    fn draw_with(catalog: &Catalog, state: &ViewState, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        let view = project(state, catalog);
        render(&view, &Palette::default(), "q: quit", area, &mut buf);
        buf
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    fn screen_text(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| row_text(buf, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_sidebar_rows() {
        let buf = draw(&ViewState::new(), 90, 20);
        assert!(row_text(&buf, 0).contains("File Explorer"));
        assert!(row_text(&buf, 2).contains(&format!("{EXPANDED} {FOLDER_OPEN_ICON} Documents")));
        assert!(row_text(&buf, 3).contains(&format!("{COLLAPSED} {FOLDER_ICON} Images")));
        assert!(row_text(&buf, 4).contains(&format!("{COLLAPSED} {FOLDER_ICON} Music")));
        assert!(row_text(&buf, 6).contains("Recent"));
        assert!(row_text(&buf, 7).contains("Starred"));
        assert!(row_text(&buf, 8).contains("Trash"));
    }

    #[test]
    fn test_selected_entry_is_highlighted() {
        let mut state = ViewState::new();
        state.select_folder(FolderId::Images);
        let buf = draw(&state, 90, 20);

        let palette = Palette::default();
        let images_row = folder_rows(Rect::new(0, 0, SIDEBAR_WIDTH, 19))
            .find(|(folder, _)| *folder == FolderId::Images)
            .map(|(_, rect)| rect)
            .unwrap();
        assert_eq!(buf[(images_row.x, images_row.y)].bg, palette.selected.bg.unwrap());
        assert_ne!(buf[(images_row.x, images_row.y - 1)].bg, palette.selected.bg.unwrap());
    }

    #[test]
    fn test_documents_table() {
        let buf = draw(&ViewState::new(), 90, 20);
        let text = screen_text(&buf);
        assert!(text.contains("Documents"));
        assert!(text.contains("Name"));
        assert!(text.contains("Modified"));
        assert!(text.contains("Project Proposal.pdf"));
        assert!(text.contains("Meeting Notes.docx"));
        assert!(text.contains("2024-03-14"));
        assert!(!text.contains("Vacation.jpg"));
        assert!(text.contains(OVERFLOW));
        assert!(row_text(&buf, 19).contains("q: quit"));
    }

    #[test]
    fn test_music_table() {
        let mut state = ViewState::new();
        state.select_folder(FolderId::Music);
        let buf = draw(&state, 90, 20);
        let text = screen_text(&buf);

        let row = text
            .lines()
            .find(|line| line.contains("Summer Mix.mp3"))
            .unwrap();
        assert!(row.contains(kind_icon(FileKind::Audio)));
        assert!(row.contains("8.2 MB"));
        assert!(row.contains("2024-03-11"));
        assert_eq!(text.matches(OVERFLOW).count(), 1);
        assert!(!text.contains("Project Proposal.pdf"));
    }

    #[test]
    fn test_icon_colored_by_kind() {
        let records: Vec<FileRecord> = FileKind::iter()
            .map(|kind| FileRecord::new(&format!("{kind} file"), kind, "1 KB", "2024-01-01"))
            .collect();
        let catalog = Catalog::new([(FolderId::Documents, records)]);
        let buf = draw_with(&catalog, &ViewState::new(), 90, 20);

        let expected = [
            (FileKind::Document, Color::Blue),
            (FileKind::Image, Color::Green),
            (FileKind::Audio, Color::Magenta),
            (FileKind::Video, Color::Red),
            (FileKind::Other, Color::Gray),
        ];
        for (kind, color) in expected {
            let y = (0..buf.area.height)
                .find(|y| row_text(&buf, *y).contains(&format!("{kind} file")))
                .unwrap();
            let x = (SIDEBAR_WIDTH..buf.area.width)
                .find(|x| buf[(*x, y)].symbol() == kind_icon(kind))
                .unwrap();
            assert_eq!(buf[(x, y)].fg, color, "icon color for {kind}");
        }
    }

    #[test]
    fn test_sidebar_hit() {
        let area = Rect::new(0, 0, 90, 20);
        assert_eq!(sidebar_hit(area, 3, 2), Some(FolderId::Documents));
        assert_eq!(sidebar_hit(area, 10, 3), Some(FolderId::Images));
        assert_eq!(sidebar_hit(area, 1, 4), Some(FolderId::Music));
        assert_eq!(sidebar_hit(area, 3, 0), None);
        assert_eq!(sidebar_hit(area, 3, 5), None);
        assert_eq!(sidebar_hit(area, 40, 2), None);
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let buf = draw(&ViewState::new(), 10, 3);
        assert_eq!(buf.area, Rect::new(0, 0, 10, 3));
    }

    #[test]
    fn test_palette_from_styles() {
        let mut styles = Styles::default();
        styles.insert(
            Mode::Browse,
            [("audio".to_string(), Style::new().fg(Color::Yellow))].into(),
        );
        let palette = Palette::from_styles(&styles, Mode::Browse);
        assert_eq!(palette.audio, Style::new().fg(Color::Yellow));
        assert_eq!(palette.image, Palette::default().image);
    }
}
