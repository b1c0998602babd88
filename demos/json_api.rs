use log::*;
use structopt::StructOpt;

use apiutil::prelude::*;
use apiutil::server::start_with_config;

/// Every integer is incremented and every string gets an "a" appended.
#[derive(serde::Serialize, serde::Deserialize, Debug, Default)]
#[serde(default)]
struct TestApiBody {
    i_64: i64,
    str: String,
    a_int: Vec<i64>,
    a_str: Vec<String>,
}

impl TestApiBody {
    fn bump(&mut self) {
        self.i_64 += 1;
        self.str.push('a');
        self.a_int.iter_mut().for_each(|i| *i += 1);
        self.a_str.iter_mut().for_each(|s| s.push('a'));
    }
}

fn bump(request: &mut Request, response: &mut ResponseWriter) {
    let path = request.path.clone();
    match (request.method, &path[..]) {
        (Method::POST, "/bump") => match decode::<TestApiBody>(request) {
            Ok(mut body) => {
                debug!("bumping {:?}", &body);
                body.bump();
                json_ok(response, &body);
            }
            Err(e) => internal_error(response, Some(&e)),
        },
        (_, "/bump") => method_not_allowed(response, None),
        (Method::GET, "/ok") => empty_ok(response),
        (Method::GET, "/hello") => text_ok(response, "Hello!"),
        (Method::GET, "/bad") => bad_request(response, None),
        (Method::GET, "/err") => not_found(response, Some(&"error")),
        (Method::GET, "/boom") => internal_error(response, Some(&"boom")),
        (Method::GET, "/secret") => unauthorized(response, None),
        (Method::GET, "/admin") => forbidden(response, None),
        _ => not_found(response, None),
    }
}

fn setup_logging(verbosity: usize) {
    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .module("apiutil")
        .verbosity(verbosity)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
    {
        eprintln!("cannot set up logging: {}", e);
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "json_api", about = "Example JSON API server. PORT overrides --port.")]
struct Opt {
    #[structopt(short, long, default_value = "8080")]
    port: i32,
    #[structopt(long, default_value = "0")]
    threads: usize,
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,
}

fn main() {
    let opt = Opt::from_args();
    setup_logging(opt.verbose);

    let config = ServerConfig::new(opt.port).with_threads(opt.threads);
    let err = start_with_config(&config, bump);
    error!("{}", err);
    std::process::exit(1);
}
