use hh_grabber_lib::{logger, Grabber};
use log::{error, info};

const URL: &str = "https://hh.ru/search/vacancy?area=113&search_field=name&search_field=company_name&work_format=REMOTE&text=Java+developer";
const TIMEOUT_MS: u64 = 10_000;

fn main() {
    logger::init();
    info!("=== HH Grabber Started ===");

    let grabber = Grabber::new();
    match grabber.grab_vacancies(URL, TIMEOUT_MS) {
        Ok(vacancies) => {
            info!("{} active vacancies grabbed from HH", vacancies.len());
        }
        Err(e) => {
            error!("Error occurred during grabbing: {}", e);
            std::process::exit(1);
        }
    }

    info!("=== HH Grabber Completed ===");
}
