use super::html::escape;

const GOOGLE_CDN: &str = "https://ajax.googleapis.com/ajax/libs";

/// Script assets a page embedding flex widgets must load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    js: Vec<String>,
}

impl Media {
    /// jQuery and jQuery UI come first when `include_jquery` is set.
    pub fn new(include_jquery: bool, static_url: &str) -> Self {
        let mut js = Vec::new();
        if include_jquery {
            js.push(format!("{GOOGLE_CDN}/jquery/1.6.1/jquery.min.js"));
            js.push(format!("{GOOGLE_CDN}/jqueryui/1.8.13/jquery-ui.min.js"));
        }
        js.push(format!(
            "{}/flexselect/js/flexselect.js",
            static_url.trim_end_matches('/')
        ));
        Self { js }
    }

    pub fn js(&self) -> &[String] {
        &self.js
    }

    pub fn render(&self) -> String {
        self.js
            .iter()
            .map(|src| format!("<script src=\"{}\"></script>", escape(src)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_script_only_by_default() {
        let media = Media::new(false, "/static/");
        assert_eq!(media.js(), ["/static/flexselect/js/flexselect.js".to_string()]);
    }

    #[test]
    fn jquery_precedes_widget_script() {
        let media = Media::new(true, "/static");
        assert_eq!(media.js().len(), 3);
        assert!(media.js()[0].ends_with("jquery.min.js"));
        assert!(media.js()[2].ends_with("flexselect.js"));
        assert_eq!(media.render().matches("<script src=").count(), 3);
    }
}
