use roundrobin_lb::proxy::proxy;
use roundrobin_lb::Config;

fn exit_on_config_error<T>(result: Result<T, roundrobin_lb::ConfigError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            log::error!("Error {}", err);
            std::process::exit(1);
        }
    }
}

#[actix_rt::main]
pub async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = exit_on_config_error(Config::load());
    let pool = exit_on_config_error(config.pool());

    for target in pool.iter() {
        log::info!("Upstream {}", target.address());
    }

    proxy(&config, pool)?.await
}
