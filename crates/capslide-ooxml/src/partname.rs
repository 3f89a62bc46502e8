//! Part name arithmetic for OPC packages
//!
//! Part names are stored without a leading slash (`ppt/slides/slide1.xml`),
//! matching ZIP entry names. Relationship targets are relative to the
//! directory of the source part.

/// Directory portion of a part name (`ppt/slides` for `ppt/slides/slide1.xml`)
pub fn directory(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// File name portion of a part name
pub fn file_name(part: &str) -> &str {
    part.rsplit_once('/').map(|(_, name)| name).unwrap_or(part)
}

/// Relationships part for a source part (`ppt/slides/_rels/slide1.xml.rels`)
///
/// The package-level relationships live at `_rels/.rels`, addressed by an
/// empty source part name.
pub fn rels_part(part: &str) -> String {
    let dir = directory(part);
    let name = file_name(part);
    if part.is_empty() {
        "_rels/.rels".to_string()
    } else if dir.is_empty() {
        format!("_rels/{}.rels", name)
    } else {
        format!("{}/_rels/{}.rels", dir, name)
    }
}

/// Resolve a relationship target against its source part
///
/// Absolute targets (`/ppt/slides/slide1.xml`) are taken from the package root.
pub fn resolve(source_part: &str, target: &str) -> String {
    let (base, target) = match target.strip_prefix('/') {
        Some(absolute) => ("", absolute),
        None => (directory(source_part), target),
    };

    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Relative target from a source part to another part in the same package
pub fn relative(source_part: &str, target_part: &str) -> String {
    let from: Vec<&str> = directory(source_part)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let to: Vec<&str> = target_part.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    // Never consume the target's file name as a shared directory
    let common = common.min(to.len().saturating_sub(1));

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat("..").take(from.len() - common));
    parts.extend(&to[common..]);
    parts.join("/")
}

/// Numeric suffix of a part's file name (`slide12.xml` -> 12)
pub fn index_of(part: &str, stem: &str) -> Option<u32> {
    file_name(part)
        .strip_prefix(stem)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rels_part() {
        assert_eq!(
            rels_part("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(
            rels_part("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
        assert_eq!(rels_part(""), "_rels/.rels");
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
        assert_eq!(
            resolve("ppt/slides/slide1.xml", "../slideLayouts/slideLayout7.xml"),
            "ppt/slideLayouts/slideLayout7.xml"
        );
        assert_eq!(
            resolve("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(resolve("", "ppt/presentation.xml"), "ppt/presentation.xml");
    }

    #[test]
    fn test_relative() {
        assert_eq!(
            relative("ppt/slides/slide3.xml", "ppt/slideLayouts/slideLayout7.xml"),
            "../slideLayouts/slideLayout7.xml"
        );
        assert_eq!(
            relative("ppt/presentation.xml", "ppt/slides/slide3.xml"),
            "slides/slide3.xml"
        );
        assert_eq!(
            relative("ppt/slides/slide1.xml", "ppt/slides/slide2.xml"),
            "slide2.xml"
        );
    }

    #[test]
    fn test_relative_then_resolve() {
        let source = "ppt/slides/slide9.xml";
        let target = "ppt/media/image2.png";
        assert_eq!(resolve(source, &relative(source, target)), target);
    }

    #[test]
    fn test_index_of() {
        assert_eq!(index_of("ppt/slides/slide12.xml", "slide"), Some(12));
        assert_eq!(index_of("ppt/slides/slideX.xml", "slide"), None);
        assert_eq!(
            index_of("ppt/slideLayouts/slideLayout3.xml", "slideLayout"),
            Some(3)
        );
    }
}
