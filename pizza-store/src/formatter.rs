use std::io::{self, Write};

pub const MIN_COLUMN_WIDTH: usize = 40;

pub fn column_width(name: &str) -> usize {
    name.chars().count().max(MIN_COLUMN_WIDTH)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableFormatter {
    headers: Vec<String>,
    widths: Vec<usize>,
}

impl TableFormatter {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> TableFormatter {
        let headers: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let widths = headers.iter().map(|h| column_width(h)).collect();

        TableFormatter { headers, widths }
    }

    pub fn header(&self) -> String {
        self.line(&self.headers)
    }

    pub fn divider(&self) -> String {
        let mut divider = String::from("+");
        for width in self.widths.iter() {
            divider.push_str(&"-".repeat(width + 2));
            divider.push('+');
        }
        divider
    }

    /// Missing trailing values render as empty cells, surplus values are dropped.
    pub fn row<S: AsRef<str>>(&self, values: &[S]) -> String {
        self.line(values)
    }

    fn line<S: AsRef<str>>(&self, values: &[S]) -> String {
        let mut line = String::from("|");
        for (i, width) in self.widths.iter().enumerate() {
            let value = values.get(i).map(|v| v.as_ref()).unwrap_or("");
            line.push_str(&format!(" {:<width$.width$} |", value, width = *width));
        }
        line
    }

    pub fn write_header(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.header())?;
        writeln!(out, "{}", self.divider())
    }

    pub fn write_row<S: AsRef<str>>(&self, out: &mut dyn Write, values: &[S]) -> io::Result<()> {
        writeln!(out, "{}", self.row(values))?;
        writeln!(out, "{}", self.divider())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(formatter: &TableFormatter, rows: &[Vec<String>]) -> String {
        let mut out = Vec::new();
        formatter.write_header(&mut out).unwrap();
        for row in rows.iter() {
            formatter.write_row(&mut out, row).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn delimiters(line: &str) -> usize {
        line.chars().filter(|c| *c == '|' || *c == '+').count()
    }

    #[test]
    fn pepperoni_table_layout() {
        let formatter = TableFormatter::new(&["id", "name"]);
        let rendered = render(&formatter, &[vec!["1".to_string(), "Pepperoni".to_string()]]);
        let lines: Vec<&str> = rendered.lines().collect();

        let dashes = "-".repeat(42);
        let divider = format!("+{}+{}+", dashes, dashes);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], format!("| {:<40} | {:<40} |", "id", "name"));
        assert_eq!(lines[1], divider);
        assert_eq!(lines[2], format!("| {:<40} | {:<40} |", "1", "Pepperoni"));
        assert_eq!(lines[3], divider);
    }

    #[test]
    fn every_line_has_one_delimiter_more_than_columns() {
        let formatter = TableFormatter::new(&["login", "password", "role"]);
        let rendered = render(&formatter, &[
            vec!["alice".to_string(), "pw".to_string(), "customer".to_string()],
            vec!["bob".to_string(), "secret".to_string(), "manager".to_string()],
        ]);

        for line in rendered.lines() {
            assert_eq!(delimiters(line), 4, "line: {}", line);
        }
        assert_eq!(rendered.lines().count(), 2 + 2 * 2);
    }

    #[test]
    fn width_is_derived_from_header_only() {
        let long_name = "a_column_name_that_is_definitely_longer_than_forty";
        let formatter = TableFormatter::new(&["id", long_name]);

        assert_eq!(formatter.widths, vec![40, long_name.len()]);
        assert_eq!(formatter.header().len(), 1 + (40 + 3) + (long_name.len() + 3));
        assert_eq!(column_width(""), MIN_COLUMN_WIDTH);
    }

    #[test]
    fn long_values_are_truncated_to_column_width() {
        let formatter = TableFormatter::new(&["description"]);
        let value = "x".repeat(55);
        let row = formatter.row(&[value.as_str()]);

        assert_eq!(row, format!("| {} |", "x".repeat(40)));
        assert_eq!(row.len(), formatter.divider().len());
    }

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let formatter = TableFormatter::new(&["a", "b", "c"]);
        let row = formatter.row(&["only"]);

        assert_eq!(delimiters(&row), 4);
        assert_eq!(row, format!("| {:<40} | {:<40} | {:<40} |", "only", "", ""));
    }

    #[test]
    fn empty_result_still_prints_header_and_divider() {
        let formatter = TableFormatter::new(&["itemname"]);
        let rendered = render(&formatter, &[]);

        assert_eq!(rendered.lines().count(), 2);
    }
}
