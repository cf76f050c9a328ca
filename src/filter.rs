use crate::model::Job;

/// Keeps jobs whose provinces, locations, categories and subjects mention any
/// keyword (case-sensitive substring). No keywords means no filtering.
/// Each job appears at most once, in input order.
pub fn filter_jobs(jobs: Vec<Job>, keywords: &[String]) -> Vec<Job> {
    if keywords.is_empty() {
        return jobs;
    }

    jobs.into_iter()
        .filter(|job| {
            let text = searchable_text(job);
            keywords.iter().any(|keyword| text.contains(keyword.as_str()))
        })
        .collect()
}

fn searchable_text(job: &Job) -> String {
    job.provinces
        .iter()
        .chain(&job.locations)
        .chain(&job.categories)
        .chain(&job.subjects)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
