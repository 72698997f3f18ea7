use anyhow::Result;
use ledangles_core::{extract_file, extract_lines, extract_str, ExtractError, Position};
use std::path::PathBuf;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources")
        .join(name)
}

fn block(x: f64, y: f64, angle: f64, designator: &str) -> Vec<String> {
    vec![
        format!("\t\t(at {x} {y} {angle})"),
        format!("\t\t(property \"Reference\" \"{designator}\""),
        "--".to_string(),
    ]
}

#[test]
fn single_block_yields_one_record() -> Result<()> {
    let placements = extract_lines([
        "\t\t(at 1.605281 -1.193121 79)",
        "\t\t(property \"Reference\" \"LED26\"",
        "--",
    ])?;

    assert_eq!(placements.len(), 1);
    let record = &placements[0];
    assert_eq!(record.designator().as_str(), "LED26");
    assert_eq!(record.prefix(), "LED");
    assert_eq!(record.sequence(), 26);
    assert_eq!(record.position(), Position::new(1.605281, -1.193121));
    assert_eq!(record.rotation(), 79.0);
    assert!(record.is_valid());
    Ok(())
}

#[test]
fn output_is_ordered_by_sequence() -> Result<()> {
    let mut lines = block(1.605283, -1.193109, 65.0, "LED27");
    lines.extend(block(1.605281, -1.193121, 79.0, "LED26"));

    let placements = extract_lines(&lines)?;
    let order: Vec<_> = placements.designators().collect();
    assert_eq!(order, vec!["LED26", "LED27"]);
    Ok(())
}

#[test]
fn many_blocks_come_out_sorted() -> Result<()> {
    let sequences = [12, 3, 55, 0, 41, 7, 30, 29];
    let lines: Vec<String> = sequences
        .iter()
        .flat_map(|seq| block(*seq as f64, 0.0, -(*seq as f64), &format!("LED{seq}")))
        .collect();

    let placements = extract_lines(&lines)?;
    assert_eq!(placements.len(), sequences.len());
    assert!(placements
        .as_slice()
        .windows(2)
        .all(|w| w[0].sequence() <= w[1].sequence()));
    Ok(())
}

#[test]
fn parsing_twice_is_identical() -> Result<()> {
    let input = std::fs::read_to_string(resource("led-angles-grep.txt"))?;
    assert_eq!(extract_str(&input)?, extract_str(&input)?);
    Ok(())
}

#[test]
fn trailing_incomplete_block_is_dropped() -> Result<()> {
    let mut lines = block(1.0, 2.0, 3.0, "LED1");
    lines.push("\t\t(at 4 5 6)".to_string());
    lines.push("\t\t(property \"Reference\" \"LED2\"".to_string());

    let placements = extract_lines(&lines)?;
    assert_eq!(placements.designators().collect::<Vec<_>>(), vec!["LED1"]);

    // position alone at end of input
    let placements = extract_lines(["(at 4 5 6)"])?;
    assert!(placements.is_empty());
    Ok(())
}

#[test]
fn designator_without_digits_is_fatal() {
    let mut lines = block(1.0, 2.0, 3.0, "LED1");
    lines.extend(block(4.0, 5.0, 6.0, "LED"));
    lines.extend(block(7.0, 8.0, 9.0, "LED3"));

    match extract_lines(&lines) {
        Err(ExtractError::Format {
            designator, line, ..
        }) => {
            assert_eq!(designator, "LED");
            assert_eq!(line, 5);
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn format_error_message_names_designator_and_line() {
    let err = extract_str("(at 0 0 0)\n(property \"Reference\" \"LED\"\n--\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 2: malformed designator 'LED': no trailing sequence number"
    );
}

#[test]
fn position_followed_by_unrelated_line_is_discarded() -> Result<()> {
    let placements = extract_lines([
        "\t\t(at 9 9 9)",
        "\t\t(layer \"F.Cu\")",
        "\t\t(at 1 2 3)",
        "\t\t(property \"Reference\" \"LED5\"",
        "--",
    ])?;

    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].position(), Position::new(1.0, 2.0));
    Ok(())
}

#[test]
fn reference_without_position_is_ignored() -> Result<()> {
    let placements = extract_lines([
        "\t\t(property \"Reference\" \"LED5\"",
        "--",
        "\t\t(property \"Reference\" \"LED\"",
    ])?;
    assert!(placements.is_empty());
    Ok(())
}

#[test]
fn lines_between_reference_and_terminator_are_skipped() -> Result<()> {
    let placements = extract_lines([
        "(at 1 2 3)",
        "(property \"Reference\" \"LED5\"",
        "(at 0 -1.43 0)",
        "",
        "(property \"Reference\" \"LED6\"",
        "--",
    ])?;

    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].designator().as_str(), "LED5");
    assert_eq!(placements[0].rotation(), 3.0);
    Ok(())
}

#[test]
fn short_lines_do_not_panic() -> Result<()> {
    let placements = extract_lines(["", "at", "(at 1)", "(at 1 2 3)", "", "--", "(", ")"])?;
    assert!(placements.is_empty());
    Ok(())
}

#[test]
fn grep_dump_listing() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let placements = extract_file(&resource("led-angles-grep.txt"))?;
    insta::assert_snapshot!(placements.to_string(), @r"
    LED.03 [  128.750,   77.100 ]   -120.5
    LED.26 [    1.605,   -1.193 ]     79.0
    LED.27 [  131.500,   82.250 ]    -45.0
    ");
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    let err = extract_file(&resource("does-not-exist.txt")).unwrap_err();
    assert!(matches!(err, ExtractError::Io(_)));
}
