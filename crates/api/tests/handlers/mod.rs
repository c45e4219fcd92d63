mod auth_test;
mod bookings_test;
mod dashboard_test;
mod health_test;
mod middleware_test;
mod tables_test;
mod venues_test;
