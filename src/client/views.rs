//! Role-view projections over the client cache. Pure functions: they read a
//! slice of appointments and return references, never mutate, never fetch.

use chrono::NaiveDate;

use crate::models::{Appointment, AppointmentStatus};

/// The single enabled staff action per status. Views must not offer anything
/// outside this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffAction {
    /// pending → check in, moves the record to waiting.
    CheckIn,
    /// pharmacy → open the bill, payment completes the record.
    OpenBill,
}

pub fn staff_action(status: AppointmentStatus) -> Option<StaffAction> {
    match status {
        AppointmentStatus::Pending => Some(StaffAction::CheckIn),
        AppointmentStatus::Pharmacy => Some(StaffAction::OpenBill),
        AppointmentStatus::Waiting
        | AppointmentStatus::Examining
        | AppointmentStatus::Completed
        | AppointmentStatus::Cancelled => None,
    }
}

/* ============================================================
   Customer view
   ============================================================ */

#[derive(Debug)]
pub struct CustomerLists<'a> {
    pub upcoming: Vec<&'a Appointment>,
    pub history: Vec<&'a Appointment>,
}

/// The customer's own records, split into active workflow vs closed history,
/// most recent appointment date first.
pub fn customer_lists<'a>(items: &'a [Appointment], owner_name: &str) -> CustomerLists<'a> {
    let mut mine: Vec<&Appointment> = items
        .iter()
        .filter(|a| a.owner_name == owner_name)
        .collect();
    mine.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));

    let (history, upcoming) = mine.into_iter().partition(|a| a.status.is_terminal());
    CustomerLists { upcoming, history }
}

/* ============================================================
   Reception view
   ============================================================ */

#[derive(Debug, Clone, Copy)]
pub struct ReceptionFilter<'a> {
    pub search: &'a str,
    pub today_only: bool,
    pub today: NaiveDate,
}

/// Reception worklist: cancelled rows hidden; optional owner/pet substring
/// search; the "today" filter always keeps pharmacy rows visible since those
/// still need billing regardless of booking date.
pub fn reception_rows<'a>(items: &'a [Appointment], filter: ReceptionFilter<'_>) -> Vec<&'a Appointment> {
    let search = filter.search.to_lowercase();
    items
        .iter()
        .filter(|a| a.status != AppointmentStatus::Cancelled)
        .filter(|a| {
            if !filter.today_only || a.status == AppointmentStatus::Pharmacy {
                return true;
            }
            a.appointment_date
                .map(|d| d.date_naive() == filter.today)
                .unwrap_or(false)
        })
        .filter(|a| {
            search.is_empty()
                || a.owner_name.to_lowercase().contains(&search)
                || a.pet_name.to_lowercase().contains(&search)
        })
        .collect()
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub waiting: usize,
    pub pharmacy: usize,
    pub completed: usize,
}

pub fn status_counts(items: &[Appointment]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for a in items {
        match a.status {
            AppointmentStatus::Pending => counts.pending += 1,
            AppointmentStatus::Waiting => counts.waiting += 1,
            AppointmentStatus::Pharmacy => counts.pharmacy += 1,
            AppointmentStatus::Completed => counts.completed += 1,
            _ => {}
        }
    }
    counts
}

/* ============================================================
   Doctor view
   ============================================================ */

/// Exam-room queue: waiting and examining records, ordered by time slot.
pub fn doctor_queue(items: &[Appointment]) -> Vec<&Appointment> {
    let mut queue: Vec<&Appointment> = items
        .iter()
        .filter(|a| {
            matches!(
                a.status,
                AppointmentStatus::Waiting | AppointmentStatus::Examining
            )
        })
        .collect();
    queue.sort_by(|a, b| a.time_slot.cmp(&b.time_slot));
    queue
}

/* ============================================================
   Queue board
   ============================================================ */

#[derive(Debug)]
pub struct QueueBoard<'a> {
    pub calling: Vec<&'a Appointment>,
    pub waiting: Vec<&'a Appointment>,
}

/// Queue-board projection: all examining records plus the first five waiting,
/// in list order.
pub fn queue_board(items: &[Appointment]) -> QueueBoard<'_> {
    QueueBoard {
        calling: items
            .iter()
            .filter(|a| a.status == AppointmentStatus::Examining)
            .collect(),
        waiting: items
            .iter()
            .filter(|a| a.status == AppointmentStatus::Waiting)
            .take(5)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn appt(id: i64, owner: &str, pet: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id,
            owner_name: owner.into(),
            phone: String::new(),
            pet_name: pet.into(),
            pet_type: "Cat".into(),
            breed: String::new(),
            weight: String::new(),
            height: String::new(),
            symptoms: "sick".into(),
            appointment_date: Some(Utc::now()),
            time_slot: "10:00".into(),
            is_walk_in: false,
            status,
            diagnosis: None,
            prescription: None,
            cost: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_staff_action_table() {
        use AppointmentStatus::*;
        assert_eq!(staff_action(Pending), Some(StaffAction::CheckIn));
        assert_eq!(staff_action(Pharmacy), Some(StaffAction::OpenBill));
        assert_eq!(staff_action(Waiting), None);
        assert_eq!(staff_action(Examining), None);
        assert_eq!(staff_action(Completed), None);
        assert_eq!(staff_action(Cancelled), None);
    }

    #[test]
    fn test_customer_lists_partition_by_terminal() {
        use AppointmentStatus::*;
        let items = vec![
            appt(1, "Somchai", "Tom", Pending),
            appt(2, "Somchai", "Tom", Completed),
            appt(3, "Somchai", "Jerry", Pharmacy),
            appt(4, "Malee", "Rex", Waiting),
            appt(5, "Somchai", "Tom", Cancelled),
        ];
        let lists = customer_lists(&items, "Somchai");
        let upcoming: Vec<i64> = lists.upcoming.iter().map(|a| a.id).collect();
        let history: Vec<i64> = lists.history.iter().map(|a| a.id).collect();
        assert_eq!(upcoming.len(), 2);
        assert!(upcoming.contains(&1) && upcoming.contains(&3));
        assert_eq!(history.len(), 2);
        assert!(history.contains(&2) && history.contains(&5));
    }

    #[test]
    fn test_reception_hides_cancelled_and_searches() {
        use AppointmentStatus::*;
        let items = vec![
            appt(1, "Somchai", "Tom", Pending),
            appt(2, "Somchai", "Tom", Cancelled),
            appt(3, "Malee", "Rex", Waiting),
        ];
        let all = reception_rows(
            &items,
            ReceptionFilter {
                search: "",
                today_only: false,
                today: Utc::now().date_naive(),
            },
        );
        assert_eq!(all.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3]);

        let found = reception_rows(
            &items,
            ReceptionFilter {
                search: "rex",
                today_only: false,
                today: Utc::now().date_naive(),
            },
        );
        assert_eq!(found.iter().map(|a| a.id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_reception_today_filter_keeps_pharmacy() {
        use AppointmentStatus::*;
        let today = Utc::now().date_naive();
        let mut yesterday_pharmacy = appt(1, "Somchai", "Tom", Pharmacy);
        yesterday_pharmacy.appointment_date = Some(Utc::now() - Duration::days(1));
        let mut yesterday_pending = appt(2, "Malee", "Rex", Pending);
        yesterday_pending.appointment_date = Some(Utc::now() - Duration::days(1));
        let items = vec![yesterday_pharmacy, yesterday_pending, appt(3, "Anan", "Mo", Waiting)];

        let rows = reception_rows(
            &items,
            ReceptionFilter {
                search: "",
                today_only: true,
                today,
            },
        );
        let ids: Vec<i64> = rows.iter().map(|a| a.id).collect();
        // Pharmacy survives the date filter; yesterday's pending does not.
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_doctor_queue_sorted_by_time_slot() {
        use AppointmentStatus::*;
        let mut a = appt(1, "Somchai", "Tom", Waiting);
        a.time_slot = "14:00".into();
        let mut b = appt(2, "Malee", "Rex", Examining);
        b.time_slot = "09:00".into();
        let c = appt(3, "Anan", "Mo", Completed);
        let items = vec![a, b, c];

        let queue = doctor_queue(&items);
        assert_eq!(queue.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_queue_board_caps_waiting_at_five() {
        use AppointmentStatus::*;
        let mut items = vec![appt(100, "Somchai", "Tom", Examining)];
        for i in 0..7 {
            items.push(appt(i, "Owner", "Pet", Waiting));
        }
        let board = queue_board(&items);
        assert_eq!(board.calling.len(), 1);
        assert_eq!(board.waiting.len(), 5);
    }

    #[test]
    fn test_status_counts() {
        use AppointmentStatus::*;
        let items = vec![
            appt(1, "a", "p", Pending),
            appt(2, "a", "p", Pending),
            appt(3, "a", "p", Waiting),
            appt(4, "a", "p", Pharmacy),
            appt(5, "a", "p", Completed),
            appt(6, "a", "p", Cancelled),
        ];
        assert_eq!(
            status_counts(&items),
            StatusCounts {
                pending: 2,
                waiting: 1,
                pharmacy: 1,
                completed: 1,
            }
        );
    }
}
