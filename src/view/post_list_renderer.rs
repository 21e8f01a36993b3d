use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::Post;

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    posts: Vec<PostItem<'a>>,
    has_posts: bool,
}

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    link: String,
    title: &'a str,
    description: &'a str,
    date: &'a str,
}

pub struct PostListRenderer<'a> {
    pub template: Template<'a>,
}

impl PostListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<PostListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post list template: {}", e)));
            }
        };

        Ok(PostListRenderer {
            template,
        })
    }

    pub fn render(&self, posts: &[Post]) -> String {
        let posts: Vec<PostItem> = posts.iter().map(|post| PostItem {
            link: format!("/blog/{}/", post.slug),
            title: post.title.as_str(),
            description: post.description.as_str(),
            date: post.date.as_str(),
        }).collect();

        self.template.render(&ListPage {
            has_posts: !posts.is_empty(),
            posts,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::POST_DATA_MD;

    use super::*;

    #[test]
    fn render_list() {
        let template_src = "{{#posts}}[{{link}}|{{title}}|{{date}}]{{/posts}}{{^has_posts}}EMPTY{{/has_posts}}";
        let renderer = PostListRenderer::new(template_src).unwrap();

        let posts = vec![Post::from_string("first-post", POST_DATA_MD).unwrap()];
        let res = renderer.render(&posts);
        assert_eq!(res, "[/blog/first-post/|My first post|2024-11-02]");

        let res = renderer.render(&[]);
        assert_eq!(res, "EMPTY");
    }
}
