use anyhow::Result;
use engagement_etl::core::ratio_filter::BUSINESS_RULE_THRESHOLD;
use engagement_etl::{
    run, CsvTableSink, CsvTableSource, DepartmentPercentage, EngagementPipeline, EtlEngine,
    LocalStorage, MalformedPolicy, MemorySink, PipelineSettings,
};
use tempfile::TempDir;

const EMPLOYEE_CSV: &str = "\
EmployeeID,Department,JobTitle,SatisfactionRating,EngagementLevel,ReportsConcerns,ProvidedSuggestions
1,Eng,Developer,5,High,False,True
2,Eng,Developer,5,High,True,False
3,Eng,Manager,2,Low,False,False
4,Eng,Developer,5,High,False,True
5,Sales,Executive,5,High,False,True
6,Sales,Executive,3,High,True,True
7,HR,Coordinator,1,Low,True,False
8,HR,Coordinator,4,High,False,False
9,HR,Manager,5,high,False,True
";

fn write_input(dir: &TempDir, name: &str, content: &str) -> Result<String> {
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    Ok(path.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_end_to_end_csv_to_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(&temp_dir, "employee_data.csv", EMPLOYEE_CSV)?;
    let output_dir = temp_dir.path().join("outputs");
    let output_path = output_dir.to_str().unwrap().to_string();

    let source = CsvTableSource::new(
        LocalStorage::new(".".to_string()),
        input,
        MalformedPolicy::Null,
    );
    let sink = CsvTableSink::new(
        LocalStorage::new(output_path.clone()),
        output_path.clone(),
        "departments_high_satisfaction.csv",
    );
    let pipeline = EngagementPipeline::new(source, sink, PipelineSettings::default());
    let engine = EtlEngine::new(pipeline);

    let summary = engine.run().await?;

    assert_eq!(summary.records_read, 9);
    assert_eq!(summary.departments_seen, 3);
    assert_eq!(summary.departments_retained, 2);
    assert!(summary
        .output_location
        .ends_with("departments_high_satisfaction.csv"));

    let written = std::fs::read_to_string(output_dir.join("departments_high_satisfaction.csv"))?;
    assert_eq!(written, "Department,Percentage\nEng,75.0\nSales,50.0\n");
    Ok(())
}

#[tokio::test]
async fn test_business_threshold_excludes_exact_half() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(&temp_dir, "employee_data.csv", EMPLOYEE_CSV)?;

    let sink = MemorySink::new();
    let rows = run(
        CsvTableSource::new(LocalStorage::new(".".to_string()), input, MalformedPolicy::Null),
        sink.clone(),
        BUSINESS_RULE_THRESHOLD,
    )
    .await?;

    assert_eq!(
        rows,
        vec![DepartmentPercentage {
            department: "Eng".to_string(),
            percentage: 75.0,
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_header_only_input_writes_header_only_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let header = EMPLOYEE_CSV.lines().next().unwrap();
    let input = write_input(&temp_dir, "empty.csv", &format!("{}\n", header))?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let rows = run(
        CsvTableSource::new(LocalStorage::new(".".to_string()), input, MalformedPolicy::Reject),
        CsvTableSink::new(LocalStorage::new(output_path.clone()), output_path.clone(), "result.csv"),
        5.0,
    )
    .await?;

    assert!(rows.is_empty());
    let written = std::fs::read_to_string(temp_dir.path().join("out/result.csv"))?;
    assert_eq!(written, "Department,Percentage\n");
    Ok(())
}

#[tokio::test]
async fn test_rejected_input_leaves_no_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let content = format!("{}10,Eng,Developer,very,High,False,True\n", EMPLOYEE_CSV);
    let input = write_input(&temp_dir, "bad.csv", &content)?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let result = run(
        CsvTableSource::new(LocalStorage::new(".".to_string()), input, MalformedPolicy::Reject),
        CsvTableSink::new(LocalStorage::new(output_path.clone()), output_path.clone(), "result.csv"),
        5.0,
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("row 11"));
    assert!(!temp_dir.path().join("out/result.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_null_policy_keeps_malformed_rows_as_non_qualifying() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let content = "\
EmployeeID,Department,JobTitle,SatisfactionRating,EngagementLevel,ReportsConcerns,ProvidedSuggestions
1,Ops,Analyst,5,High,False,True
2,Ops,Analyst,excellent,High,False,True
";
    let input = write_input(&temp_dir, "ops.csv", content)?;

    let rows = run(
        CsvTableSource::new(LocalStorage::new(".".to_string()), input, MalformedPolicy::Null),
        MemorySink::new(),
        5.0,
    )
    .await?;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].department, "Ops");
    assert_eq!(rows[0].percentage, 50.0);
    Ok(())
}

#[tokio::test]
async fn test_partitioned_run_matches_sequential_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(&temp_dir, "employee_data.csv", EMPLOYEE_CSV)?;

    let mut results = Vec::new();
    for partitions in [1, 3] {
        let sink = MemorySink::new();
        let pipeline = EngagementPipeline::new(
            CsvTableSource::new(
                LocalStorage::new(".".to_string()),
                input.clone(),
                MalformedPolicy::Null,
            ),
            sink.clone(),
            PipelineSettings {
                partitions,
                ..PipelineSettings::default()
            },
        );
        EtlEngine::new(pipeline).run().await?;
        results.push(sink.rows().await.unwrap());
    }

    assert_eq!(results[0], results[1]);
    Ok(())
}
