mod loopback;
mod scenarios;
