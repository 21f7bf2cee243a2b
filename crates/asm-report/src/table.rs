//! Plain-text tables and section rules.

/// Width of the rule framing each report section.
pub const RULE_WIDTH: usize = 74;

/// Section title framed by two dashed rules.
pub fn section_rule(title: &str) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    format!("\n{rule} \n{title} \n{rule} \n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Borders around the table and under the header only
    Outline,
    /// A border between every row
    Grid,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
        self
    }

    /// Empty row separating groups of values.
    pub fn spacer(&mut self) -> &mut Self {
        self.rows.push(vec![String::new(); self.headers.len()]);
        self
    }

    pub fn render(&self, style: TableStyle) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                std::iter::once(&self.headers[col])
                    .chain(self.rows.iter().map(|row| &row[col]))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border = |fill: char| {
            let mut line = String::from("+");
            for w in &widths {
                line.extend(std::iter::repeat_n(fill, w + 2));
                line.push('+');
            }
            line
        };
        let line = |cells: &[String]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect();
            format!("| {} |", padded.join(" | "))
        };

        let mut out = vec![border('-'), line(&self.headers), border('=')];
        for (i, row) in self.rows.iter().enumerate() {
            if style == TableStyle::Grid && i > 0 {
                out.push(border('-'));
            }
            out.push(line(row));
        }
        out.push(border('-'));
        out.join("\n")
    }
}
