use std::io::Write;

use super::labels::{LABEL_TABLE, locate};
use super::layout::MAX_LINE_SPAN;
use super::lookahead::next_valid_line;
use super::normalize::{normalize, title_case};
use super::patterns::PatternLibrary;
use super::*;
use crate::model::{ExtractionRecord, FieldKey};

fn crlv_lines() -> Vec<&'static str> {
    vec![
        "REPÚBLICA FEDERATIVA DO BRASIL",
        "CERTIFICADO DE REGISTRO E LICENCIAMENTO DE VEÍCULO - DIGITAL",
        "CÓDIGO RENAVAM",
        "01234567890",
        "PLACA",
        "ABC1D23",
        "EXERCÍCIO",
        "2024",
        "ANO FABRICAÇÃO",
        "2019",
        "ANO MODELO",
        "NULL",
        "2020",
        "MARCA / MODELO / VERSÃO",
        "ESPÉCIE / TIPO",
        "PASSAGEIRO AUTOMOVEL",
        "",
        "VW/GOL 1.0L MC4",
        "COR PREDOMINANTE",
        "COMBUSTÍVEL",
        "ÁLCOOL/GASOLINA",
        "  PRETA  ",
        "CATEGORIA",
        "Chassi",
        "LOCAL",
        "SAO PAULO SP",
        "9BWAB45U0LT012345",
        "DATA",
        "12/05/2024",
    ]
}

fn extractor() -> CrlvExtractor {
    CrlvExtractor::new(LayoutProfile::default()).expect("default extractor should build")
}

fn resolve(lines: &[&str], field: FieldKey) -> Option<String> {
    let extraction = extractor().extract(&LineSequence::from_lines(lines.iter().copied()));
    extraction.record.get(field).map(ToOwned::to_owned)
}

fn miss(lines: &[&str], field: FieldKey) -> Option<Miss> {
    let extraction = extractor().extract(&LineSequence::from_lines(lines.iter().copied()));
    extraction
        .resolutions
        .iter()
        .find(|resolution| resolution.field == field)
        .and_then(|resolution| resolution.miss)
}

#[test]
fn normalize_collapses_whitespace_and_uppercases() {
    assert_eq!(normalize("  código\t renavam \n"), "CÓDIGO RENAVAM");
    assert_eq!(normalize(""), "");
    assert_eq!(normalize(" \t \u{a0} "), "");
    assert_eq!(normalize("marca / modelo /  versão"), "MARCA / MODELO / VERSÃO");
}

#[test]
fn normalize_treats_information_separators_as_spacing() {
    assert_eq!(normalize("a\u{1f}b\u{1c}"), "A B");
    assert_eq!(normalize("\u{0b}placa\u{1d}\u{1e}abc1234\u{85}"), "PLACA ABC1234");
}

#[test]
fn normalize_is_idempotent() {
    for sample in crlv_lines().into_iter().chain(["  a\t\tb  ", "ß", "\u{2003}x\u{2003}"]) {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once, "sample {sample:?}");
    }
}

#[test]
fn title_case_restarts_words_after_non_letters() {
    assert_eq!(title_case("PRETA"), "Preta");
    assert_eq!(title_case("VERDE ESCURO"), "Verde Escuro");
    assert_eq!(title_case("9BWAB45U0LT012345"), "9Bwab45U0Lt012345");
    assert_eq!(title_case("ÁLCOOL/GASOLINA"), "Álcool/Gasolina");
    assert_eq!(title_case(""), "");
}

#[test]
fn plate_pattern_accepts_legacy_and_mercosul_shapes() {
    let patterns = PatternLibrary::new().expect("patterns should compile");

    assert_eq!(patterns.find_plate("ABC1234"), Some("ABC1234"));
    assert_eq!(patterns.find_plate("ABC1D23"), Some("ABC1D23"));
    assert_eq!(patterns.find_plate("PLACA ABC1D23 SP"), Some("ABC1D23"));
    assert_eq!(patterns.find_plate("ABCD123"), None);
    assert_eq!(patterns.find_plate("ABC12345"), None);
    assert_eq!(patterns.find_plate("abc1234"), None);
}

#[test]
fn year_pattern_is_bounded_to_1900_through_2099() {
    let patterns = PatternLibrary::new().expect("patterns should compile");

    assert_eq!(patterns.find_year("1900"), Some("1900"));
    assert_eq!(patterns.find_year("FAB 2099"), Some("2099"));
    assert_eq!(patterns.find_year("1899"), None);
    assert_eq!(patterns.find_year("2100"), None);
    assert_eq!(patterns.find_year("120190"), None);
    assert_eq!(patterns.find_year("2019/2020"), Some("2019"));
}

#[test]
fn renavam_pattern_requires_nine_to_twelve_digits() {
    let patterns = PatternLibrary::new().expect("patterns should compile");

    assert_eq!(patterns.find_renavam("12345678"), None);
    assert_eq!(patterns.find_renavam("123456789"), Some("123456789"));
    assert_eq!(patterns.find_renavam("x 123456789012 y"), Some("123456789012"));
    assert_eq!(patterns.find_renavam("1234567890123"), None);
}

#[test]
fn line_sequence_keeps_views_aligned_across_pages() {
    let pages = vec![
        "CÓDIGO RENAVAM\r\n  01234567890 \r\n".to_string(),
        String::new(),
        "placa\rABC1234\n\nNULL".to_string(),
    ];
    let lines = LineSequence::from_pages(&pages);

    assert_eq!(lines.len(), 6);
    assert_eq!(lines.original_lines().len(), lines.normalized_lines().len());
    assert_eq!(lines.original(1), Some("  01234567890 "));
    assert_eq!(lines.normalized(2), Some("PLACA"));
    assert_eq!(lines.normalized(4), Some(""));
    assert_eq!(lines.original(6), None);
    assert_eq!(lines.original_window(4, 10).len(), 2);
    assert!(lines.original_window(9, 3).is_empty());
}

#[test]
fn line_sequence_splits_on_every_line_boundary() {
    let pages = vec![
        "a\u{0b}b\u{0c}c\u{1c}d\u{1d}e\u{1e}f\u{85}g\u{2028}h\u{2029}i\u{1f}j\n".to_string(),
        "k\n\n".to_string(),
    ];
    let lines = LineSequence::from_pages(&pages);

    assert_eq!(
        lines.original_lines(),
        ["a", "b", "c", "d", "e", "f", "g", "h", "i\u{1f}j", "k", ""]
    );
    assert_eq!(lines.normalized(8), Some("I J"));
}

#[test]
fn next_valid_line_trims_information_separators() {
    let lines = LineSequence::from_lines(["\u{1f}", " \u{1c}FIAT/UNO\u{1f} "]);

    assert_eq!(next_valid_line(&lines, 0, 8, "NULL"), Some("FIAT/UNO"));
}

#[test]
fn locate_keeps_first_occurrence_and_skips_missing_labels() {
    let lines = LineSequence::from_lines(["texto", "placa anterior", "CÓDIGO  RENAVAM", "PLACA"]);
    let labels = locate(lines.normalized_lines(), &LABEL_TABLE);

    assert_eq!(labels.get(FieldKey::Placa), Some(1));
    assert_eq!(labels.get(FieldKey::Renavam), Some(2));
    assert_eq!(labels.get(FieldKey::TesteChassi), None);
    assert_eq!(labels.len(), 2);
}

#[test]
fn locate_records_several_labels_on_one_line() {
    let lines = LineSequence::from_lines(["ANO FABRICAÇÃO ANO MODELO", "2019 2020"]);
    let labels = locate(lines.normalized_lines(), &LABEL_TABLE);

    assert_eq!(labels.get(FieldKey::AnoFabricacao), Some(0));
    assert_eq!(labels.get(FieldKey::AnoModelo), Some(0));
}

#[test]
fn next_valid_line_skips_blank_and_placeholder_lines() {
    let lines = LineSequence::from_lines(["LABEL", "", "  null ", "   ", "  valor  "]);

    assert_eq!(next_valid_line(&lines, 1, 8, "NULL"), Some("valor"));
    assert_eq!(next_valid_line(&lines, 0, 8, "NULL"), Some("LABEL"));
}

#[test]
fn next_valid_line_horizon_is_inclusive() {
    let within = LineSequence::from_lines(["", "", "X"]);
    assert_eq!(next_valid_line(&within, 0, 2, "NULL"), Some("X"));

    let beyond = LineSequence::from_lines(["", "", "", "X"]);
    assert_eq!(next_valid_line(&beyond, 0, 2, "NULL"), None);
}

#[test]
fn next_valid_line_stops_at_end_of_sequence() {
    let lines = LineSequence::from_lines(["A", "", "NULL"]);

    assert_eq!(next_valid_line(&lines, 1, 8, "NULL"), None);
    assert_eq!(next_valid_line(&lines, 10, 8, "NULL"), None);
}

#[test]
fn extracts_every_field_from_a_complete_document() {
    let extraction = extractor().extract(&LineSequence::from_lines(crlv_lines()));

    let expected = ExtractionRecord {
        renavam: Some("01234567890".to_string()),
        placa: Some("ABC1D23".to_string()),
        ano_fabricacao: Some("2019".to_string()),
        ano_modelo: Some("2020".to_string()),
        marca_modelo_versao: Some("VW/GOL 1.0L MC4".to_string()),
        cor_predominante: Some("Preta".to_string()),
        teste_chassi: Some("9Bwab45U0Lt012345".to_string()),
    };
    assert_eq!(extraction.record, expected);
    assert_eq!(extraction.misses().count(), 0);
    assert_eq!(extraction.labels.len(), FieldKey::ALL.len());
}

#[test]
fn extraction_is_idempotent() {
    let extractor = extractor();
    let lines = LineSequence::from_lines(crlv_lines());

    assert_eq!(extractor.extract(&lines), extractor.extract(&lines));
}

#[test]
fn extract_pages_matches_line_based_extraction() {
    let extractor = extractor();
    let lines = crlv_lines();
    let pages = vec![lines[..12].join("\n"), lines[12..].join("\n")];

    assert_eq!(
        extractor.extract_pages(&pages).record,
        extractor.extract(&LineSequence::from_lines(lines)).record
    );
}

#[test]
fn plate_skips_blank_and_placeholder_lines() {
    assert_eq!(
        resolve(&["PLACA", "", "NULL", "ABC1234"], FieldKey::Placa),
        Some("ABC1234".to_string())
    );
}

#[test]
fn plate_on_the_label_line_is_found() {
    assert_eq!(
        resolve(&["PLACA ABC1D23", "EXERCÍCIO 2024"], FieldKey::Placa),
        Some("ABC1D23".to_string())
    );
}

#[test]
fn plate_falls_back_to_whole_document() {
    let mut lines = vec!["DKF9A87 ANTERIOR", "PLACA"];
    lines.extend(["SEM VALOR"; 6]);
    lines.push("xyz9876");

    // The document-wide search also sees lines before the label.
    assert_eq!(resolve(&lines, FieldKey::Placa), Some("DKF9A87".to_string()));
}

#[test]
fn plate_fallback_matches_lowercase_source_after_normalization() {
    let mut lines = vec!["PLACA"];
    lines.extend(["SEM VALOR"; 6]);
    lines.push("placa atual xyz9876");

    assert_eq!(resolve(&lines, FieldKey::Placa), Some("XYZ9876".to_string()));
}

#[test]
fn renavam_strips_dots_and_spaces_in_window() {
    assert_eq!(
        resolve(&["CÓDIGO RENAVAM", "012.345.678.90"], FieldKey::Renavam),
        Some("01234567890".to_string())
    );
    assert_eq!(
        resolve(&["CÓDIGO RENAVAM", "", "0123 4567 890"], FieldKey::Renavam),
        Some("01234567890".to_string())
    );
}

#[test]
fn renavam_glued_to_following_line_is_recovered_by_fallback() {
    // Stripping spaces joins "01234567890" and "PLACA" into one word, so
    // only the document-wide search sees the number on its own.
    let lines = ["CÓDIGO RENAVAM", "01234567890", "PLACA ABC1234"];

    assert_eq!(resolve(&lines, FieldKey::Renavam), Some("01234567890".to_string()));
}

#[test]
fn renavam_falls_back_to_whole_document() {
    let mut lines = vec!["CÓDIGO RENAVAM"];
    lines.extend([
        "PLACA",
        "EXERCÍCIO",
        "ANO FABRICAÇÃO",
        "ANO MODELO",
        "MARCA",
        "CATEGORIA",
    ]);
    lines.extend(["OBSERVAÇÕES"; 10]);
    lines.push("123456789");

    assert_eq!(resolve(&lines, FieldKey::Renavam), Some("123456789".to_string()));
}

#[test]
fn renavam_label_on_last_line_still_uses_fallback() {
    assert_eq!(
        resolve(&["NUMERO 98765432100", "CÓDIGO RENAVAM"], FieldKey::Renavam),
        Some("98765432100".to_string())
    );
}

#[test]
fn renavam_without_any_candidate_is_a_pattern_mismatch() {
    let lines = ["CÓDIGO RENAVAM", "12345", "ABC"];

    assert_eq!(resolve(&lines, FieldKey::Renavam), None);
    assert_eq!(miss(&lines, FieldKey::Renavam), Some(Miss::PatternMismatch));
}

fn year_document(year_offset: usize) -> Vec<String> {
    let mut lines = vec!["CABEÇALHO".to_string(); 5];
    lines.push("ANO FABRICAÇÃO".to_string());
    lines.push("ESPÉCIE".to_string());
    lines.extend(std::iter::repeat_n("TEXTO".to_string(), 12));
    lines[5 + year_offset] = "2018".to_string();
    lines
}

#[test]
fn year_probe_reaches_offset_seven() {
    let lines = year_document(7);
    let lines = lines.iter().map(String::as_str).collect::<Vec<&str>>();

    assert_eq!(resolve(&lines, FieldKey::AnoFabricacao), Some("2018".to_string()));
}

#[test]
fn year_probe_stops_before_offset_eight() {
    let lines = year_document(8);
    let lines = lines.iter().map(String::as_str).collect::<Vec<&str>>();

    assert_eq!(resolve(&lines, FieldKey::AnoFabricacao), None);
    assert_eq!(miss(&lines, FieldKey::AnoFabricacao), Some(Miss::PatternMismatch));
}

#[test]
fn year_scanned_line_takes_precedence_over_probe() {
    let lines = ["ANO MODELO", "", "MODELO 2021", "2019"];

    assert_eq!(resolve(&lines, FieldKey::AnoModelo), Some("2021".to_string()));
}

#[test]
fn year_scanner_may_reach_past_probe_range_over_blank_lines() {
    let mut lines = vec!["ANO FABRICAÇÃO"];
    lines.extend(["", "NULL", "", "", "", "", ""]);
    lines.push("2015");

    assert_eq!(resolve(&lines, FieldKey::AnoFabricacao), Some("2015".to_string()));
}

#[test]
fn year_fields_resolve_independently() {
    let lines = ["ANO FABRICAÇÃO", "2010", "ANO MODELO", "NULL", "2011"];

    assert_eq!(resolve(&lines, FieldKey::AnoFabricacao), Some("2010".to_string()));
    assert_eq!(resolve(&lines, FieldKey::AnoModelo), Some("2011".to_string()));
}

#[test]
fn make_model_keeps_original_text() {
    let lines = ["Marca / Modelo / Versão", "a", "b", "c", "  Fiat/Uno  Mille  "];

    assert_eq!(
        resolve(&lines, FieldKey::MarcaModeloVersao),
        Some("Fiat/Uno  Mille".to_string())
    );
}

#[test]
fn free_text_fields_have_no_fallback() {
    let lines = ["COR PREDOMINANTE", "", "", "", "", "", "", "", "", "", "", "", "BRANCA"];

    assert_eq!(resolve(&lines, FieldKey::CorPredominante), None);
    assert_eq!(
        miss(&lines, FieldKey::CorPredominante),
        Some(Miss::HorizonExhausted)
    );
}

#[test]
fn missing_chassis_label_resolves_to_absence() {
    let lines = crlv_lines()
        .into_iter()
        .filter(|line| *line != "Chassi")
        .collect::<Vec<&str>>();

    assert_eq!(resolve(&lines, FieldKey::TesteChassi), None);
    assert_eq!(miss(&lines, FieldKey::TesteChassi), Some(Miss::LabelNotFound));
}

#[test]
fn empty_document_yields_all_absent_record() {
    let extraction = extractor().extract(&LineSequence::default());

    assert_eq!(extraction.record, ExtractionRecord::default());
    assert!(
        extraction
            .misses()
            .all(|(_, miss)| miss == Miss::LabelNotFound)
    );
    assert_eq!(extraction.misses().count(), FieldKey::ALL.len());
}

#[test]
fn layout_profile_offsets_drive_resolution() {
    let profile = LayoutProfile {
        make_model_offset: 1,
        ..LayoutProfile::default()
    };
    let extractor = CrlvExtractor::new(profile).expect("extractor should build");
    let extraction = extractor.extract(&LineSequence::from_lines(crlv_lines()));

    assert_eq!(extraction.record.get(FieldKey::MarcaModeloVersao), Some("ESPÉCIE / TIPO"));
}

#[test]
fn layout_profile_validation_rejects_inverted_probe_range() {
    let profile = LayoutProfile {
        year_probe_first_offset: 5,
        year_probe_last_offset: 3,
        ..LayoutProfile::default()
    };

    assert!(profile.validated().is_err());
}

#[test]
fn layout_profile_validation_rejects_spans_past_the_limit() {
    let profile = LayoutProfile {
        chassis_offset: MAX_LINE_SPAN + 1,
        ..LayoutProfile::default()
    };
    assert!(profile.validated().is_err());

    let profile = LayoutProfile {
        max_lookahead: MAX_LINE_SPAN,
        year_probe_last_offset: MAX_LINE_SPAN,
        ..LayoutProfile::default()
    };
    assert!(profile.validated().is_ok());
}

#[test]
fn layout_profile_load_rejects_offset_at_usize_max() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, r#"{{ "make_model_offset": {} }}"#, usize::MAX).expect("write profile");

    let error = LayoutProfile::load(Some(file.path())).expect_err("profile should be rejected");
    assert!(format!("{error:#}").contains("make_model_offset"));
}

#[test]
fn unvalidated_extreme_offsets_resolve_to_absence() {
    let profile = LayoutProfile {
        max_lookahead: usize::MAX,
        year_scan_offset: usize::MAX,
        year_probe_last_offset: usize::MAX,
        make_model_offset: usize::MAX,
        color_offset: usize::MAX,
        chassis_offset: usize::MAX,
        renavam_window: usize::MAX,
        plate_window: usize::MAX,
        ..LayoutProfile::default()
    };
    let extractor = CrlvExtractor::new(profile).expect("extractor should build");
    let lines = LineSequence::from_lines([
        "x",
        "MARCA / MODELO / VERSÃO",
        "ANO MODELO",
        "COR PREDOMINANTE",
        "PLACA",
        "ABC1234",
    ]);

    let extraction = extractor.extract(&lines);
    let miss_for = |field: FieldKey| {
        extraction
            .resolutions
            .iter()
            .find(|resolution| resolution.field == field)
            .and_then(|resolution| resolution.miss)
    };

    assert_eq!(miss_for(FieldKey::MarcaModeloVersao), Some(Miss::HorizonExhausted));
    assert_eq!(miss_for(FieldKey::CorPredominante), Some(Miss::HorizonExhausted));
    assert_eq!(miss_for(FieldKey::AnoModelo), Some(Miss::HorizonExhausted));
    assert_eq!(extraction.record.get(FieldKey::AnoModelo), None);
    assert_eq!(extraction.record.get(FieldKey::Placa), Some("ABC1234"));
}

#[test]
fn year_offsets_near_usize_max_stop_without_overflow() {
    let profile = LayoutProfile {
        year_probe_first_offset: usize::MAX - 1,
        year_probe_last_offset: usize::MAX,
        ..LayoutProfile::default()
    };
    let extractor = CrlvExtractor::new(profile).expect("extractor should build");
    let lines = LineSequence::from_lines(["x", "ANO FABRICAÇÃO", "sem ano"]);

    let extraction = extractor.extract(&lines);
    assert_eq!(extraction.record.get(FieldKey::AnoFabricacao), None);
}

#[test]
fn layout_profile_normalizes_placeholder_token() {
    let profile = LayoutProfile {
        placeholder_token: "  n/a ".to_string(),
        ..LayoutProfile::default()
    }
    .validated()
    .expect("profile should validate");

    assert_eq!(profile.placeholder_token, "N/A");
}

#[test]
fn layout_profile_loads_partial_json_over_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, r#"{{ "color_offset": 2, "max_lookahead": 4 }}"#).expect("write profile");

    let profile = LayoutProfile::load(Some(file.path())).expect("profile should load");
    assert_eq!(profile.color_offset, 2);
    assert_eq!(profile.max_lookahead, 4);
    assert_eq!(profile.chassis_offset, 3);
    assert_eq!(profile.placeholder_token, "NULL");
}

#[test]
fn layout_profile_rejects_unknown_keys() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, r#"{{ "colour_offset": 2 }}"#).expect("write profile");

    assert!(LayoutProfile::load(Some(file.path())).is_err());
}
