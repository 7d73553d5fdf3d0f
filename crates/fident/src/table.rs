use fident_archive::{BatchReport, FileItem, human_size};
use tabled::{
    Table, Tabled,
    settings::{Panel, Style},
};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub header: Option<String>,
    pub footer: Option<String>,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if let Some(header) = self.header {
            table.with(Panel::header(header));
        }
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }

        table.with(Style::blank());
        table
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct FileRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Size")]
    pub size: String,
    #[tabled(rename = "Kind")]
    pub kind: &'static str,
    #[tabled(rename = "Path")]
    pub path: String,
}

impl From<&FileItem> for FileRow {
    fn from(item: &FileItem) -> Self {
        Self {
            name: item.name.clone(),
            size: item.size.clone(),
            kind: if item.is_image { "image" } else { "file" },
            path: item.path.display().to_string(),
        }
    }
}

pub fn items(report: &BatchReport) -> Vec<FileItem> {
    report.files().map(FileItem::from).collect()
}

pub fn render(report: &BatchReport, dropped: usize) -> Table {
    let items = items(report);
    let total: u64 = items.iter().map(|i| i.size_bytes).sum();

    Formatter {
        header: Some(format!("{} files from {dropped} dropped", items.len())),
        footer: Some(format!("total {}", human_size(total))),
    }
    .build(items.iter().map(FileRow::from))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn item(name: &str, size_bytes: u64, is_image: bool) -> FileItem {
        FileItem {
            name: name.to_string(),
            path: PathBuf::from("/tmp/fident-unzipped-x").join(name),
            size: human_size(size_bytes),
            size_bytes,
            is_image,
        }
    }

    #[test]
    fn rows_carry_kind() {
        assert_eq!(FileRow::from(&item("a.png", 1, true)).kind, "image");
        assert_eq!(FileRow::from(&item("a.txt", 1, false)).kind, "file");
    }

    #[test]
    fn table_has_header_footer_and_rows() {
        let rows = [item("a.txt", 5, false), item("scan.png", 1536, true)];
        let table = Formatter {
            header: Some("2 files".into()),
            footer: Some("total 1.5 KB".into()),
        }
        .build(rows.iter().map(FileRow::from))
        .to_string();

        assert!(table.contains("2 files"));
        assert!(table.contains("Name"));
        assert!(table.contains("scan.png"));
        assert!(table.contains("1.5 KB"));
        assert!(table.contains("total 1.5 KB"));
    }

    #[test]
    fn empty_report_renders() {
        let table = render(&BatchReport::default(), 0).to_string();
        assert!(table.contains("0 files from 0 dropped"));
        assert!(table.contains("total 0 B"));
    }
}
