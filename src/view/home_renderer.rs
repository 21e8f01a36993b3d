use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::resume::{Resume, SectionItem, SubItem, TimelineItem};

#[derive(ramhorns::Content)]
struct HomePage<'a> {
    site_title: &'a str,
    profile: Vec<Paragraph<'a>>,
    education: TimelineSection<'a>,
    work: TimelineSection<'a>,
    skills: SkillsSection<'a>,
}

#[derive(ramhorns::Content)]
struct Paragraph<'a> {
    text: &'a str,
}

#[derive(ramhorns::Content)]
struct TimelineSection<'a> {
    section_title: &'a str,
    items: Vec<TimelineItemView<'a>>,
}

#[derive(ramhorns::Content)]
struct TimelineItemView<'a> {
    title: &'a str,
    date: &'a str,
    location: &'a str,
    subitems: Vec<SubItemView<'a>>,
    collapsed: bool,
}

#[derive(ramhorns::Content)]
struct SubItemView<'a> {
    has_category: bool,
    category: &'a str,
    description: &'a str,
}

#[derive(ramhorns::Content)]
struct SkillsSection<'a> {
    section_title: &'a str,
    items: Vec<SkillItemView<'a>>,
}

#[derive(ramhorns::Content)]
struct SkillItemView<'a> {
    category: &'a str,
    description: &'a str,
    collapsed: bool,
}

// The collapsible widgets show a teaser before expansion: timelines show
// their first entry, plain sections their first two.
const TIMELINE_TEASER: usize = 1;
const SECTION_TEASER: usize = 2;

pub struct HomeRenderer<'a> {
    pub template: Template<'a>,
}

impl HomeRenderer<'_> {
    pub fn new(home_tpl_src: &str) -> io::Result<HomeRenderer> {
        let template = match Template::new(home_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing home template: {}", e)));
            }
        };

        Ok(HomeRenderer {
            template,
        })
    }

    pub fn render(&self, site_title: &str, resume: &Resume) -> String {
        let page = HomePage {
            site_title,
            profile: resume.profile.iter().map(|text| Paragraph { text }).collect(),
            education: timeline_section("Education", &resume.education),
            work: timeline_section("Work Experience", &resume.work),
            skills: SkillsSection {
                section_title: "Skills",
                items: resume.skills.iter().enumerate().map(|(i, item)| skill_view(i, item)).collect(),
            },
        };

        self.template.render(&page)
    }
}

fn timeline_section<'a>(title: &'a str, items: &'a [TimelineItem]) -> TimelineSection<'a> {
    TimelineSection {
        section_title: title,
        items: items.iter().enumerate().map(|(i, item)| TimelineItemView {
            title: item.title.as_str(),
            date: item.date.as_str(),
            location: item.location.as_str(),
            subitems: item.subitems.iter().map(sub_item_view).collect(),
            collapsed: i >= TIMELINE_TEASER,
        }).collect(),
    }
}

fn sub_item_view(subitem: &SubItem) -> SubItemView {
    SubItemView {
        has_category: subitem.category.is_some(),
        category: subitem.category.as_deref().unwrap_or(""),
        description: subitem.description.as_str(),
    }
}

fn skill_view(index: usize, item: &SectionItem) -> SkillItemView {
    SkillItemView {
        category: item.category.as_str(),
        description: item.description.as_str(),
        collapsed: index >= SECTION_TEASER,
    }
}

#[cfg(test)]
mod tests {
    use crate::resume::Resume;
    use crate::test_data::RESUME_DATA_TOML;

    use super::*;

    #[test]
    fn render_home() {
        let template_src = r##"TITLE=[{{site_title}}]
PROFILE=[{{#profile}}({{text}}){{/profile}}]
EDUCATION=[{{#education}}{{#items}}({{title}}|{{#collapsed}}hidden{{/collapsed}}{{^collapsed}}shown{{/collapsed}}){{/items}}{{/education}}]
SKILLS=[{{#skills}}{{#items}}({{category}}|{{#collapsed}}hidden{{/collapsed}}{{^collapsed}}shown{{/collapsed}}){{/items}}{{/skills}}]"##;
        let renderer = HomeRenderer::new(template_src).unwrap();
        let resume = Resume::from_string(RESUME_DATA_TOML).unwrap();
        let res = renderer.render("Gabriel Hauss", &resume);

        assert!(res.contains("TITLE=[Gabriel Hauss]"));
        assert!(res.contains("(First profile paragraph.)"));
        // First timeline entry is the visible teaser, the rest collapse.
        assert!(res.contains("(MSc Software Engineering (Part-Time)|shown)"));
        assert!(res.contains("(BSc Physics and Mathematics|hidden)"));
        // Skills show two teaser entries.
        assert!(res.contains("(Programming Languages|shown)"));
        assert!(res.contains("(Frameworks|shown)"));
        assert!(res.contains("(Tools|hidden)"));
    }
}
