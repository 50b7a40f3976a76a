use pagesim::common::PageNumber;
use pagesim::process::ProcessInfo;

#[allow(dead_code)]
pub fn processes() -> Vec<ProcessInfo> {
    vec![
        ProcessInfo::new(101, "nginx", 48),
        ProcessInfo::new(202, "postgres", 160),
        ProcessInfo::new(303, "redis", 24),
        ProcessInfo::new(404, "tiny", 3),
    ]
}

/// The reference string most OS textbooks use for replacement exercises.
#[allow(dead_code)]
pub fn reference_string() -> Vec<PageNumber> {
    vec![7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1]
}
