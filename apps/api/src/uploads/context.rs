/// Joins uploaded documents into the prompt context string.
///
/// Files with no extracted text are skipped. Each file renders as
/// `--- name ---\n<content>\n`, and files are separated by a blank line.
pub fn build_file_context(files: &[(String, String)]) -> String {
    files
        .iter()
        .filter(|(_, content)| !content.is_empty())
        .map(|(filename, content)| format!("--- {filename} ---\n{content}\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_files_are_skipped() {
        let files = vec![
            ("scan.pdf".to_string(), String::new()),
            ("handbook.txt".to_string(), "PTO: 20 days".to_string()),
        ];
        assert_eq!(build_file_context(&files), "--- handbook.txt ---\nPTO: 20 days\n");
    }

    #[test]
    fn test_files_are_joined_in_order() {
        let files = vec![
            ("a.md".to_string(), "one".to_string()),
            ("b.md".to_string(), "two".to_string()),
        ];
        assert_eq!(
            build_file_context(&files),
            "--- a.md ---\none\n\n--- b.md ---\ntwo\n"
        );
    }

    #[test]
    fn test_no_files_is_empty() {
        assert_eq!(build_file_context(&[]), "");
    }
}
