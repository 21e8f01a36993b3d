use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::Post;

#[derive(ramhorns::Content)]
struct PostPage<'a> {
    title: &'a str,
    date: &'a str,
    description: &'a str,
    post_content: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(post_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(post_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post template: {}", e)));
            }
        };

        Ok(PostRenderer {
            template,
        })
    }

    pub fn render(&self, post: &Post, rendered_body: &str) -> String {
        self.template.render(&PostPage {
            title: post.title.as_str(),
            date: post.date.as_str(),
            description: post.description.as_str(),
            post_content: rendered_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::POST_DATA_MD;

    use super::*;

    #[test]
    fn render_post() {
        let template_src = r##"TITLE=[{{title}}]
DATE=[{{date}}]
DESC=[{{description}}]
CONTENT=[{{{post_content}}}]"##;
        let renderer = PostRenderer::new(template_src).unwrap();
        let post = Post::from_string("first-post", POST_DATA_MD).unwrap();
        let body = post.render_body().unwrap();
        let res = renderer.render(&post, &body);

        assert!(res.contains("TITLE=[My first post]"));
        assert!(res.contains("DATE=[2024-11-02]"));
        assert!(res.contains("<h1>Hello</h1>"));
    }
}
