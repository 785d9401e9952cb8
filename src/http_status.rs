//! The subset of HTTP response status codes the kit deals in.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    OK200,
    NotFound404,
    InternalServerError500,
}

impl HttpStatus {
    pub fn code(self) -> u16 {
        match self {
            HttpStatus::OK200 => 200,
            HttpStatus::NotFound404 => 404,
            HttpStatus::InternalServerError500 => 500,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            HttpStatus::OK200 => "OK",
            HttpStatus::NotFound404 => "Page not found",
            HttpStatus::InternalServerError500 => "Internal server error",
        }
    }

    pub fn desc(self) -> &'static str {
        match self {
            HttpStatus::OK200 => "The request succeeded.",
            HttpStatus::NotFound404 =>
                "There is no page at this address. Check the address, \
                 or add a template for it.",
            HttpStatus::InternalServerError500 =>
                "Something went wrong serving this page. The details \
                 have been logged on the server.",
        }
    }
}
