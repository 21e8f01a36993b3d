pub const POST_DATA_MD: &str = r#"+++
title = "My first post"
date = "2024-11-02"
description = "Hello from the new blog"
+++

# Hello

This is the body, in *markdown*.

- one
- two
"#;

pub const RESUME_DATA_TOML: &str = r#"
profile = [
    "First profile paragraph.",
    "Second profile paragraph.",
]

[[education]]
title = "MSc Software Engineering (Part-Time)"
date = "(10/2024 - 07/2026)"
location = "University of Oxford, Oxford, United Kingdom"
subitems = [
    { category = "Subjects", description = "Algorithms, Machine Learning" },
]

[[education]]
title = "BSc Physics and Mathematics"
date = "(02/2020 - 02/2023)"
location = "Maastricht University, Maastricht, Netherlands"
subitems = [
    { category = "Achievements", description = "Summa cum laude" },
    { description = "Graduated early" },
]

[[work]]
title = "Software Engineer"
date = "(02/2023 - Present)"
location = "Maastricht University, Maastricht, Netherlands"
subitems = [
    { category = "Projects", description = "Custom CMS" },
]

[[skills]]
category = "Programming Languages"
description = "Rust, TypeScript, Python"

[[skills]]
category = "Frameworks"
description = "ntex, React"

[[skills]]
category = "Tools"
description = "Git, Docker"
"#;
