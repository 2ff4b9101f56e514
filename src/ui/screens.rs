use crate::models::Student;

/// Scrollable snapshot of every student, taken when the list screen opens.
pub(crate) struct StudentListScreen {
    pub(crate) students: Vec<Student>,
    pub(crate) selected: usize,
}

impl StudentListScreen {
    pub(crate) fn new(students: Vec<Student>) -> Self {
        Self {
            students,
            selected: 0,
        }
    }

    pub(crate) fn current_student(&self) -> Option<&Student> {
        self.students.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.students.is_empty() {
            return;
        }
        let len = self.students.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.students.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_with(count: usize) -> StudentListScreen {
        let students = (0..count)
            .map(|idx| Student::new(&format!("Student {idx}"), "other", "A", 50.0, 50.0).unwrap())
            .collect();
        StudentListScreen::new(students)
    }

    #[test]
    fn selection_is_clamped() {
        let mut screen = screen_with(3);
        screen.move_selection(-1);
        assert_eq!(screen.selected, 0);
        screen.move_selection(5);
        assert_eq!(screen.selected, 2);
        screen.select_first();
        assert_eq!(screen.current_student().unwrap().name(), "Student 0");
        screen.select_last();
        assert_eq!(screen.current_student().unwrap().name(), "Student 2");
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut screen = screen_with(0);
        screen.move_selection(1);
        screen.select_last();
        assert_eq!(screen.selected, 0);
        assert!(screen.current_student().is_none());
    }
}
