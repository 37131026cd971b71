//! Column-aligned tables for `show` and `config show`.
//!
//! Pretty mode aligns the columns, prints a coloured header and highlights
//! selected rows. Terse mode prints each row as space-separated cells with
//! no header, for scripts.

const HEADER_COLOR: &str = "\x1b[33m";
const HIGHLIGHT_COLOR: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    /// Pad on the right.
    #[default]
    Left,
    /// Pad on the left.
    Right,
}

#[derive(Debug, Clone)]
struct Row {
    cells: Vec<String>,
    highlight: bool,
}

/// A table of string cells.
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    align: Vec<Align>,
    spacing: usize,
    rows: Vec<Row>,
}

impl Table {
    /// An empty table with the given column headers.
    #[must_use]
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(ToString::to_string).collect(),
            align: vec![Align::Left; header.len()],
            spacing: 2,
            rows: Vec::new(),
        }
    }

    /// Set the alignment of column `column`.
    #[must_use]
    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.align.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Append a row; `highlight` rows are coloured in pretty mode.
    pub fn push(&mut self, cells: Vec<String>, highlight: bool) {
        self.rows.push(Row { cells, highlight });
    }

    /// `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header and rows with every column padded to its widest cell.
    #[must_use]
    pub fn aligned(&self) -> Vec<String> {
        let widths = self.widths();
        std::iter::once(&self.header)
            .chain(self.rows.iter().map(|r| &r.cells))
            .map(|cells| self.align_row(cells, &widths))
            .collect()
    }

    /// Render the table. An empty table renders as nothing, header included.
    #[must_use]
    pub fn render(&self, pretty: bool) -> String {
        if self.is_empty() {
            return String::new();
        }
        if !pretty {
            return self
                .rows
                .iter()
                .map(|r| format!("{}\n", r.cells.join(" ")))
                .collect();
        }

        let mut out = String::new();
        for (i, line) in self.aligned().into_iter().enumerate() {
            let color = match i.checked_sub(1) {
                None => Some(HEADER_COLOR),
                Some(row) if self.rows.get(row).is_some_and(|r| r.highlight) => {
                    Some(HIGHLIGHT_COLOR)
                }
                Some(_) => None,
            };
            match color {
                Some(color) => out.push_str(&format!("{color}{line}{RESET}\n")),
                None => out.push_str(&format!("{line}\n")),
            }
        }
        out
    }

    /// Print the rendered table to stdout.
    #[allow(clippy::print_stdout)]
    pub fn print(&self, pretty: bool) {
        print!("{}", self.render(pretty));
    }

    fn widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(|r| r.cells.len())
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0);
        (0..columns)
            .map(|i| {
                std::iter::once(&self.header)
                    .chain(self.rows.iter().map(|r| &r.cells))
                    .filter_map(|cells| cells.get(i))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn align_row(&self, cells: &[String], widths: &[usize]) -> String {
        let spacing = " ".repeat(self.spacing);
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, &width))| match self.align.get(i) {
                Some(Align::Right) => format!("{cell:>width$}"),
                _ => format!("{cell:<width$}"),
            })
            .collect();
        padded.join(&spacing).trim_end().to_string()
    }
}

/// A section heading, coloured like a table header in pretty mode.
#[must_use]
pub fn heading(text: &str, pretty: bool) -> String {
    if pretty {
        format!("{HEADER_COLOR}{text}{RESET}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn targets_table() -> Table {
        let mut table = Table::new(&["Name", "Target dest", "Installed"]);
        table.push(
            vec!["vimrc".into(), "/home/u/.vimrc".into(), "true".into()],
            true,
        );
        table.push(
            vec!["vim".into(), "/home/u/.vim".into(), "false".into()],
            false,
        );
        table
    }

    #[test]
    fn columns_are_aligned() {
        insta::assert_snapshot!(targets_table().aligned().join("\n"), @r"
        Name   Target dest     Installed
        vimrc  /home/u/.vimrc  true
        vim    /home/u/.vim    false
        ");
    }

    #[test]
    fn right_aligned_column() {
        let mut table =
            Table::new(&["Group", "Enabled", "Variants", "Installed"]).align(2, Align::Right);
        table.push(
            vec!["bash".into(), "work".into(), "2".into(), "false".into()],
            false,
        );
        table.push(
            vec!["vim".into(), "default".into(), "1".into(), "true".into()],
            true,
        );
        insta::assert_snapshot!(table.aligned().join("\n"), @r"
        Group  Enabled  Variants  Installed
        bash   work            2  false
        vim    default         1  true
        ");
    }

    #[test]
    fn terse_has_no_header_or_padding() {
        insta::assert_snapshot!(targets_table().render(false), @r"
        vimrc /home/u/.vimrc true
        vim /home/u/.vim false
        ");
    }

    #[test]
    fn pretty_colours_header_and_highlighted_rows() {
        let rendered = targets_table().render(true);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with(HEADER_COLOR));
        assert!(lines[1].starts_with(HIGHLIGHT_COLOR));
        assert!(!lines[2].contains('\x1b'));
    }

    #[test]
    fn empty_table_renders_nothing() {
        let table = Table::new(&["Name"]);
        assert_eq!(table.render(true), "");
        assert_eq!(table.render(false), "");
    }

    #[test]
    fn heading_is_plain_in_terse_mode() {
        assert_eq!(heading("vim/default:", false), "vim/default:");
        assert!(heading("vim/default:", true).contains("vim/default:"));
    }
}
