use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

#[derive(ramhorns::Content)]
struct NotFoundPage<'a> {
    message: &'a str,
    back_link: &'a str,
    back_label: &'a str,
}

pub struct NotFoundRenderer<'a> {
    pub template: Template<'a>,
}

impl NotFoundRenderer<'_> {
    pub fn new(not_found_tpl_src: &str) -> io::Result<NotFoundRenderer> {
        let template = match Template::new(not_found_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing not-found template: {}", e)));
            }
        };

        Ok(NotFoundRenderer {
            template,
        })
    }

    pub fn render(&self, message: &str, back_link: &str, back_label: &str) -> String {
        self.template.render(&NotFoundPage {
            message,
            back_link,
            back_label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_not_found() {
        let template_src = "[{{message}}]({{back_link}}|{{back_label}})";
        let renderer = NotFoundRenderer::new(template_src).unwrap();
        let res = renderer.render("This post does not exist.", "/blog", "Back to blog");
        assert_eq!(res, "[This post does not exist.](/blog|Back to blog)");
    }
}
