//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Wall-clock times are
//! stored as the verbatim `HH:MM[:SS]` strings the domain validated, and days
//! of the week as `SMALLINT` 0-6 with Sunday as 0.

diesel::table! {
    /// Account profiles with salted password digests.
    profiles (id) {
        id -> Uuid,
        role -> Varchar,
        name -> Varchar,
        email -> Varchar,
        password_salt -> Varchar,
        password_digest -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Caregivers, either linked to a profile or carrying guest contact fields.
    caregivers (id) {
        id -> Uuid,
        profile_id -> Nullable<Uuid>,
        name -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        /// Unique six-digit guest access code.
        access_code -> Nullable<Varchar>,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    care_recipients (id) {
        id -> Uuid,
        name -> Varchar,
        date_of_birth -> Nullable<Date>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Weekly recurring shifts.
    schedules (id) {
        id -> Uuid,
        care_recipient_id -> Uuid,
        caregiver_id -> Uuid,
        day_of_week -> Int2,
        start_time -> Varchar,
        end_time -> Varchar,
    }
}

diesel::table! {
    tasks (id) {
        id -> Uuid,
        schedule_id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        due_time -> Nullable<Varchar>,
        sort_order -> Int4,
    }
}

diesel::table! {
    /// One row per (task, caregiver, date).
    task_logs (id) {
        id -> Uuid,
        task_id -> Uuid,
        caregiver_id -> Uuid,
        log_date -> Date,
        status -> Varchar,
        notes -> Nullable<Text>,
        logged_at -> Timestamptz,
    }
}

diesel::table! {
    medications (id) {
        id -> Uuid,
        care_recipient_id -> Uuid,
        name -> Varchar,
        dosage -> Varchar,
        instructions -> Nullable<Text>,
        is_active -> Bool,
    }
}

diesel::table! {
    medication_schedules (id) {
        id -> Uuid,
        medication_id -> Uuid,
        time_of_day -> Varchar,
        frequency -> Varchar,
        day_of_week -> Nullable<Int2>,
    }
}

diesel::table! {
    /// One row per (medication schedule, date); `caregiver_id` records who
    /// acted but is not part of the key.
    medication_logs (id) {
        id -> Uuid,
        medication_schedule_id -> Uuid,
        caregiver_id -> Uuid,
        log_date -> Date,
        status -> Varchar,
        notes -> Nullable<Text>,
        logged_at -> Timestamptz,
    }
}

diesel::table! {
    appointments (id) {
        id -> Uuid,
        care_recipient_id -> Uuid,
        caregiver_id -> Nullable<Uuid>,
        appointment_date -> Date,
        appointment_time -> Varchar,
        kind -> Varchar,
        location -> Nullable<Varchar>,
        notes -> Nullable<Text>,
        status -> Varchar,
    }
}

diesel::table! {
    /// Browser push subscriptions, unique on endpoint.
    push_subscriptions (id) {
        id -> Uuid,
        user_id -> Uuid,
        endpoint -> Text,
        p256dh -> Text,
        auth -> Text,
        user_agent -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(caregivers -> profiles (profile_id));
diesel::joinable!(schedules -> care_recipients (care_recipient_id));
diesel::joinable!(schedules -> caregivers (caregiver_id));
diesel::joinable!(tasks -> schedules (schedule_id));
diesel::joinable!(task_logs -> tasks (task_id));
diesel::joinable!(medications -> care_recipients (care_recipient_id));
diesel::joinable!(medication_schedules -> medications (medication_id));
diesel::joinable!(medication_logs -> medication_schedules (medication_schedule_id));
diesel::joinable!(appointments -> care_recipients (care_recipient_id));
diesel::joinable!(push_subscriptions -> profiles (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    profiles,
    caregivers,
    care_recipients,
    schedules,
    tasks,
    task_logs,
    medications,
    medication_schedules,
    medication_logs,
    appointments,
    push_subscriptions,
);
