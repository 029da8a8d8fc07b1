//! Analytics export becomes ranked report files

use crate::prelude::*;

#[test]
fn analytics_writes_three_ranked_reports() {
    let project = Project::empty();
    project.file(
        "input/analytics.tsv",
        "Page path level 1\tPageviews\n/alpha\t10\n/beta.js\t4\n/beta\t12\n/alpha.js?x\t1\n",
    );

    project.ferry().args(&["analytics"]).passes().stdout_has("2 items");

    assert_eq!(project.read("output2/page.txt"), "beta: 12\nalpha: 10\n");
    assert_eq!(project.read("output2/embed.txt"), "beta: 4\nalpha: 1\n");
    assert_eq!(project.read("output2/total.txt"), "beta: 16\nalpha: 11\n");
}

#[test]
fn analytics_out_dir_flag() {
    let project = Project::empty();
    project.file("stats.tsv", "/a\t1\n");

    project
        .ferry()
        .args(&["analytics", "--input", "stats.tsv", "--out-dir", "reports"])
        .passes();

    assert_eq!(project.read("reports/total.txt"), "a: 1\n");
}
