use student_records::{Gender, Student, Subject, ValidationError};

fn sample() -> Student {
    Student::new("Ada", "female", "CS-1", 80.0, 90.0).unwrap()
}

#[test]
fn new_sets_fields_and_leaves_store_fields_empty() {
    let student = sample();
    assert_eq!(student.id(), 0);
    assert_eq!(student.name(), "Ada");
    assert_eq!(student.gender(), Gender::Female);
    assert_eq!(student.class_name(), "CS-1");
    assert_eq!(student.math_score(), 80.0);
    assert_eq!(student.java_score(), 90.0);
    assert_eq!(student.created_at(), None);
    assert_eq!(student.updated_at(), None);
}

#[test]
fn every_known_gender_is_accepted() {
    for (raw, expected) in [
        ("male", Gender::Male),
        ("female", Gender::Female),
        ("other", Gender::Other),
        ("  Female ", Gender::Female),
    ] {
        let mut student = sample();
        student.set_gender(raw).unwrap();
        assert_eq!(student.gender(), expected);
        assert_eq!(student.gender().as_str(), raw.trim().to_lowercase());
    }
}

#[test]
fn unknown_gender_is_rejected_without_changing_state() {
    for raw in ["", "robot", "m", "males"] {
        let mut student = sample();
        let err = student.set_gender(raw).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidGender(_)));
        assert_eq!(student.gender(), Gender::Female);

        assert!(Student::new("Ada", raw, "CS-1", 50.0, 50.0).is_err());
    }
}

#[test]
fn scores_accepted_only_within_bounds() {
    let mut student = sample();
    for valid in [0.0, 0.01, 59.5, 99.99, 100.0] {
        student.set_math_score(valid).unwrap();
        student.set_java_score(valid).unwrap();
        assert_eq!(student.math_score(), valid);
        assert_eq!(student.java_score(), valid);
    }

    student.set_math_score(42.0).unwrap();
    student.set_java_score(43.0).unwrap();
    for invalid in [-0.01, 100.01, -50.0, 1000.0, f64::NAN, f64::INFINITY] {
        let err = student.set_math_score(invalid).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ScoreOutOfRange {
                subject: Subject::Math,
                ..
            }
        ));
        let err = student.set_java_score(invalid).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ScoreOutOfRange {
                subject: Subject::Java,
                ..
            }
        ));
        assert_eq!(student.math_score(), 42.0);
        assert_eq!(student.java_score(), 43.0);
    }
}

#[test]
fn constructor_rejects_out_of_range_scores() {
    assert!(Student::new("Ada", "male", "A", -0.01, 50.0).is_err());
    assert!(Student::new("Ada", "male", "A", 50.0, 100.01).is_err());
    assert!(Student::new("Ada", "male", "A", 0.0, 100.0).is_ok());
}

#[test]
fn blank_name_is_rejected() {
    assert_eq!(
        Student::new("   ", "male", "A", 1.0, 1.0).unwrap_err(),
        ValidationError::EmptyName
    );

    let mut student = sample();
    assert_eq!(student.set_name("").unwrap_err(), ValidationError::EmptyName);
    assert_eq!(student.name(), "Ada");
    student.set_name(" Grace ").unwrap();
    assert_eq!(student.name(), "Grace");
}

#[test]
fn total_and_average_track_current_scores() {
    let mut student = Student::new("Zero", "other", "", 0.0, 0.0).unwrap();
    assert_eq!(student.total(), 0.0);
    assert_eq!(student.average(), 0.0);

    for (math, java) in [(80.0, 90.0), (100.0, 0.0), (33.5, 66.25)] {
        student.set_math_score(math).unwrap();
        student.set_java_score(java).unwrap();
        assert_eq!(student.total(), math + java);
        assert_eq!(student.average(), student.total() / 2.0);
        assert_eq!(student.average(), (math + java) / 2.0);
    }
}

#[test]
fn class_name_is_free_text() {
    let mut student = sample();
    student.set_class_name("  Evening cohort #2 ");
    assert_eq!(student.class_name(), "Evening cohort #2");
}

#[test]
fn display_columns_line_up_across_genders() {
    let male = Student::new("A", "male", "CS-1", 80.0, 90.0).unwrap();
    let female = Student::new("A", "female", "CS-1", 80.0, 90.0).unwrap();
    let other = Student::new("A", "other", "CS-1", 80.0, 90.0).unwrap();

    let male_line = male.to_string();
    let female_line = female.to_string();
    let offset = male_line.find("Class:");
    assert!(offset.is_some());
    assert_eq!(offset, female_line.find("Class:"));
    assert_eq!(offset, other.to_string().find("Class:"));
    assert_eq!(male_line.len(), female_line.len());
    assert!(male_line.contains("Gender: male    Class: CS-1"));
    assert!(male_line.ends_with("Avg: 85.00"));
}

#[test]
fn gender_display_honours_width() {
    assert_eq!(format!("[{:<7}]", Gender::Male), "[male   ]");
    assert_eq!(format!("[{:>6}]", Gender::Other), "[ other]");
}

#[test]
fn validation_messages_are_readable() {
    let err = Student::new("Ada", "male", "A", 120.0, 50.0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Math score must be between 0 and 100 (got 120)."
    );
    let err = "robot".parse::<Gender>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Gender must be one of male, female or other (got 'robot')."
    );
}
