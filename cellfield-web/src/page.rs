//! Page conventions shared by the bindings.

/// Id of the hero canvas the particle field draws on.
pub const CELL_CANVAS_ID: &str = "cell-animation";

/// Id given to the canvas the backdrop creates for itself.
pub const BACKDROP_CANVAS_ID: &str = "gradient-canvas";

/// Body class that opts a page into the gradient backdrop.
pub const BACKDROP_CLASS: &str = "has-gradient-bg";

/// Inline style that pins the backdrop canvas behind the page content.
pub const BACKDROP_STYLE: [(&str, &str); 7] = [
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("z-index", "-1"),
    ("pointer-events", "none"),
];

/// Whether a page whose `<body>` carries `class_name` gets the backdrop.
///
/// Pages opt in with [`BACKDROP_CLASS`]; a body without any class gets it too.
pub fn wants_backdrop(class_name: &str) -> bool {
    class_name.is_empty() || class_name.split_whitespace().any(|c| c == BACKDROP_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backdrop_opt_in() {
        assert!(wants_backdrop(""));
        assert!(wants_backdrop("has-gradient-bg"));
        assert!(wants_backdrop("dark  has-gradient-bg docs"));
    }

    #[test]
    fn test_backdrop_opt_out() {
        assert!(!wants_backdrop("docs"));
        // Class tokens match whole words only
        assert!(!wants_backdrop("has-gradient-bg-lite"));
    }
}
